#[actix_web::main]
async fn main() -> std::io::Result<()> {
    render_form_server::run().await
}
