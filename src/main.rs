#[actix_web::main]
async fn main() -> std::io::Result<()> {
    phrase_coach_lib::run().await
}
