use snapview::error::AppResult;

fn main() -> AppResult<()> {
    snapview::entry::run()
}
