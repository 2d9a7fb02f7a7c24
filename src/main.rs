fn main() -> anyhow::Result<()> {
    reqfilter::run()
}
