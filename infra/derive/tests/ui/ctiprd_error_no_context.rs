use ctiprd_derive::ctiprd_error;

#[ctiprd_error]
pub enum DemoError {
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
}

fn main() {}
