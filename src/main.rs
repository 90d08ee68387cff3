use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    chatview_cli::run().await
}
