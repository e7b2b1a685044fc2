// Title heuristics and entry ordering for the navigational index

use std::cmp::Ordering;

/// Leading ordinal prefix up to and including the first `_`, e.g. `001_`
pub fn ordinal_prefix(name: &str) -> Option<&str> {
    name.find('_').map(|i| &name[..=i])
}

/// Prefix of `name` ending with its first digit run, e.g. `ABC0001` for
/// `ABC0001FooBar`.
///
/// `None` when the name has no digits or the prefix is the whole name.
pub fn until_first_num_sequence(name: &str) -> Option<&str> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let end = name[start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| start + i)?;
    Some(&name[..end])
}

/// Split at every lowercase to uppercase transition
pub fn split_camel_cased(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in name.chars() {
        if c.is_uppercase() && current.chars().last().is_some_and(char::is_lowercase) {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Human-readable title for an entry's base name
pub fn derive_title(name: &str) -> String {
    let without_prefix = match ordinal_prefix(name) {
        Some(prefix) => &name[prefix.len()..],
        None => name,
    };

    let without_number = match until_first_num_sequence(without_prefix) {
        Some(leading) => format!(" {}", &without_prefix[leading.len()..]),
        None => without_prefix.to_string(),
    };

    split_camel_cased(&without_number)
        .join(" ")
        .replace('_', " ")
        .trim()
        .to_string()
}

/// Sort key of an entry: its numeric prefix when it has one
pub fn sort_key(name: &str) -> &str {
    until_first_num_sequence(name).unwrap_or(name)
}

/// Total order over sibling names.
///
/// Keys compare naturally (digit runs by value), ties by the raw name.
pub fn compare_entries(a: &str, b: &str) -> Ordering {
    natural_cmp(sort_key(a), sort_key(b)).then_with(|| a.cmp(b))
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let left = take_digits(&mut a);
                let right = take_digits(&mut b);
                let ord = compare_numbers(&left, &right);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

/// Compare digit strings by value without overflow
fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
