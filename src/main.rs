#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flashdecks::run().await
}
