use crate::error::ServerResult;
use axum::extract::Multipart;
use simcheck::FileInput;
use std::collections::HashMap;

/// Parts of a multipart form, split by whether they carry a file name.
#[derive(Debug, Default)]
pub(crate) struct Form {
    pub texts: HashMap<String, String>,
    pub files: HashMap<String, FileInput>,
}

impl Form {
    pub async fn read(mut multipart: Multipart) -> ServerResult<Self> {
        let mut form = Form::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match field.file_name().map(str::to_string) {
                // Browsers send an unnamed empty part when no file was picked.
                Some(file_name) if file_name.is_empty() => {
                    field.bytes().await?;
                }
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    let mut file = FileInput::new(file_name, bytes);
                    if let Some(content_type) = content_type {
                        file = file.with_content_type(content_type);
                    }
                    form.files.insert(name, file);
                }
                None => {
                    let text = field.text().await?;
                    form.texts.insert(name, text);
                }
            }
        }
        Ok(form)
    }
}
