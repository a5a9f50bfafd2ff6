use http::HeaderMap;
use micro_content::body::apply_headers;
use micro_content::content::{ByteBufferContent, FileStreamContent, MultipartFormContent, UrlEncodedFormContent};
use micro_content::protocol::{Content, ContentError};
use std::io;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

fn build_form(path: Option<String>) -> Result<MultipartFormContent, ContentError> {
    let mut form = MultipartFormContent::new();
    form.add(ByteBufferContent::from("zava"), "user")?;
    form.add(UrlEncodedFormContent::new([("lang", "rust"), ("q", "multipart body")]), "query")?;

    match path {
        Some(path) => {
            let file = FileStreamContent::open(&path)?;
            form.add_file(file, "upload", path)?;
        }
        None => form.add_file(ByteBufferContent::from("hello world\n"), "upload", "hello.txt")?,
    }

    Ok(form)
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut form = match build_form(std::env::args().nth(1)) {
        Ok(form) => form,
        Err(e) => {
            error!(cause = %e, "failed to build form");
            return;
        }
    };

    let mut headers = HeaderMap::new();
    match apply_headers(&form, &mut headers) {
        Ok(payload_size) => info!(?payload_size, content_type = form.content_type(), "declared body"),
        Err(e) => {
            error!(cause = %e, "failed to measure form");
            return;
        }
    }

    let stdout = io::stdout();
    if let Err(e) = form.write_to(&mut stdout.lock()) {
        error!(cause = %e, "failed to write form");
    }
    form.dispose();
}
