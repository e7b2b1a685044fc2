use dokgen::annotations::*;
use std::fmt::Write;

fn main() {
    #[text]
    r#"
    # Drawing basics

    Programs in this guide build a string canvas.
    "#;

    #[media::image]
    "media/canvas.png";

    #[application]
    {
        let mut canvas = String::new();

        #[code::block("Draw a row of stars")]
        {
            for _ in 0..5 {
                canvas.push('*');
            }
        }

        #[exclude]
        {
            writeln!(canvas).unwrap();
            println!("{}", canvas);
        }
    }

    #[code("Helpers stay in the document")]
    fn stars(n: usize) -> String {
        "*".repeat(n)
    }
}
