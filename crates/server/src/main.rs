#[tokio::main]
async fn main() -> anyhow::Result<()> {
    personachat_server::start().await
}
