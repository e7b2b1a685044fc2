// Output generation module

pub mod markdown;
pub mod templates;

pub use markdown::MarkdownRenderer;
pub use templates::ProgramTemplate;
