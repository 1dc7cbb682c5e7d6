use anyhow::Result;

fn main() -> Result<()> {
    repo_prompt::cli::run()
}
