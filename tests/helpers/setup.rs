use callme_api::Application;
use callme_infra::{setup_inmemory_context, CallmeContext};

// Launch the application as a background task on a random port
pub async fn spawn_app() -> (CallmeContext, String) {
    let mut ctx = setup_inmemory_context();
    ctx.config.port = 0;

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    (ctx, address)
}
