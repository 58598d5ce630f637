#[tokio::main]
async fn main() -> anyhow::Result<()> {
    paper_digest_lib::run().await
}
