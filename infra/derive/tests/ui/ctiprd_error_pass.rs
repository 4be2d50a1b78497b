use ctiprd_derive::ctiprd_error;
use std::borrow::Cow;

#[ctiprd_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Rejected value {value}")]
    Rejected { value: u32 },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<String, DemoError> {
    std::fs::read_to_string("/definitely/not/here").context("Reading demo file")
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.kind(), "Io");
    let _: DemoError = "boom".into();
    let _: DemoError = String::from("boom").into();
}
