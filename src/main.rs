#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    procurement_server::run().await
}
