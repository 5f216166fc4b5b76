use retint::{ENV_API_KEY, ENV_SEGMENT_ENDPOINT, ENV_UPLOAD_ENDPOINT, RetintError};

pub fn report_error(err: &RetintError) {
    match err {
        RetintError::Segmentation(_) | RetintError::Upload(_) => {
            eprintln!("{err}");
            eprintln!();
            eprintln!("Check the service configuration:");
            eprintln!("  - Endpoint: --endpoint / {ENV_SEGMENT_ENDPOINT}");
            eprintln!("  - Upload:   --upload-endpoint / {ENV_UPLOAD_ENDPOINT}");
            eprintln!("  - API key:  --api-key / {ENV_API_KEY}");
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
