use axum::body::Bytes;

/// Raw text fields of a product form, exactly as submitted.
#[derive(Debug, Clone, Default)]
pub struct ProductFields {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub discount: Option<String>,
    pub category_ids: Option<String>,
}

/// A buffered file taken from the `images` form field.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub fields: ProductFields,
    pub files: Vec<UploadedFile>,
}

/// An uploaded file after it was written to the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub original_name: String,
    pub filename: String,
}
