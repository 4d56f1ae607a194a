use actix_web::{guard, web};

use super::{generate_image::generate_image, responder, static_files};

pub const GENERATE_IMAGE_PATH: &str = "/api/generate-image";

/// OPTIONS anywhere is a preflight, the generation path goes to its handler,
/// everything else is a static asset.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{tail:.*}")
            .guard(guard::Options())
            .to(responder::preflight),
    )
    .service(web::resource(GENERATE_IMAGE_PATH).to(generate_image))
    .service(web::resource("/{tail:.*}").to(static_files::serve));
}
