fn main() -> anyhow::Result<()> {
    journal_core::cli::run()
}
