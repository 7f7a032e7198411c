#[tokio::main]
async fn main() {
    airdrop::start(std::env::args()).await;
}
