use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    closure_review::apps::run_review_courses(std::env::args().skip(1))
}
