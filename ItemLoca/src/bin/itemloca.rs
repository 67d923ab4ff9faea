fn main() -> anyhow::Result<()> {
    itemloca::cli::run_cli()
}
