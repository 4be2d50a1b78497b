use ctiprd_derive::ctiprd_error;

#[ctiprd_error]
pub enum DemoError {
    #[error("IO error: {0}")] Io(std::io::Error),
}

fn main() {}
