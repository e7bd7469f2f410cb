fn main() -> anyhow::Result<()> {
    gipoly_client::run()
}
