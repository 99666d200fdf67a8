use axum::{
    extract::{FromRequestParts, Multipart, Path},
    http::request::Parts,
};

use crate::{
    error::{AppError, Result},
    models::{ProductForm, UploadedFile},
};

const IMAGES_FIELD: &str = "images";

/// Buffers a product multipart form. Unknown fields are skipped.
pub async fn read_product_form(mut multipart: Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart request: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGES_FIELD {
            let original_name = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read image: {}", e)))?;

            // browsers send an empty part when no file was picked
            if original_name.is_empty() && data.is_empty() {
                continue;
            }

            form.files.push(UploadedFile {
                original_name,
                data,
            });
            continue;
        }

        let slot = match name.as_str() {
            "name" => &mut form.fields.name,
            "price" => &mut form.fields.price,
            "description" => &mut form.fields.description,
            "discount" => &mut form.fields.discount,
            "categoryIds" => &mut form.fields.category_ids,
            _ => continue,
        };

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid field '{}': {}", name, e)))?;
        *slot = Some(value);
    }

    Ok(form)
}

/// Numeric `{id}` path segment; a bad segment is a JSON `BadRequest`.
#[derive(Debug, Clone, Copy)]
pub struct IdParam(pub i32);

impl<S> FromRequestParts<S> for IdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        Ok(Self(id))
    }
}
