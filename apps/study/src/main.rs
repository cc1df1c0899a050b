fn main() -> anyhow::Result<()> {
    flashdeck_study::run()
}
