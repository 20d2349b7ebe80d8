//! Multipart form reading
//!
//! Text parts are collected by name, file parts by name into [`UploadedFile`].
//! Field lookups accept both `snake_case` and `camelCase` names, so
//! `first_name` also matches a `firstName` part.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use shared::error::{AppError, ErrorCode};

use crate::upload::UploadedFile;

#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl MultipartForm {
    /// Read every part. Parts with a filename are files, the rest are text.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            AppError::with_message(
                ErrorCode::InvalidMultipart,
                format!("Invalid multipart request: {e}"),
            )
        })? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);

            if file_name.is_some() {
                let data = field.bytes().await.map_err(|e| {
                    AppError::with_message(
                        ErrorCode::InvalidMultipart,
                        format!("Multipart error: {e}"),
                    )
                })?;
                // An empty file input is submitted as a nameless, empty part
                if data.is_empty() && file_name.as_deref() == Some("") {
                    continue;
                }
                form.files.insert(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        data: data.to_vec(),
                    },
                );
            } else {
                let text = field.text().await.map_err(|e| {
                    AppError::with_message(
                        ErrorCode::InvalidMultipart,
                        format!("Multipart error: {e}"),
                    )
                })?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    fn lookup<'a, V>(map: &'a HashMap<String, V>, name: &str) -> Option<&'a V> {
        map.get(name).or_else(|| map.get(&camel_case(name)))
    }

    /// Trimmed text value; blank counts as absent
    pub fn text(&self, name: &str) -> Option<String> {
        Self::lookup(&self.fields, name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn required(&self, name: &str) -> Result<String, AppError> {
        self.text(name).ok_or_else(|| {
            AppError::with_message(ErrorCode::RequiredField, format!("{name} is required"))
                .with_detail("field", name)
        })
    }

    /// Parse an optional value (numbers, enums)
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.text(name)
            .map(|v| {
                v.parse::<T>().map_err(|e| {
                    AppError::validation(format!("{name}: {e}")).with_detail("field", name)
                })
            })
            .transpose()
    }

    pub fn parse_required<T>(&self, name: &str) -> Result<T, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.parse(name)?.ok_or_else(|| {
            AppError::with_message(ErrorCode::RequiredField, format!("{name} is required"))
                .with_detail("field", name)
        })
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files
            .remove(name)
            .or_else(|| self.files.remove(&camel_case(name)))
    }
}

#[cfg(test)]
impl MultipartForm {
    pub(crate) fn with_fields(fields: &[(&str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ClientStatus;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("first_name"), "firstName");
        assert_eq!(camel_case("profile_img"), "profileImg");
        assert_eq!(camel_case("email"), "email");
    }

    #[test]
    fn test_text_accepts_both_spellings() {
        let form = MultipartForm::with_fields(&[("firstName", " Aline "), ("last_name", "Uwase")]);
        assert_eq!(form.text("first_name").as_deref(), Some("Aline"));
        assert_eq!(form.text("last_name").as_deref(), Some("Uwase"));
        assert_eq!(form.text("phone"), None);
    }

    #[test]
    fn test_required_and_blank() {
        let form = MultipartForm::with_fields(&[("email", "   ")]);
        let err = form.required("email").unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
    }

    #[test]
    fn test_parse_enum_and_number() {
        let form = MultipartForm::with_fields(&[
            ("status", "pending"),
            ("job_id", "42"),
            ("year", "twenty"),
        ]);
        assert_eq!(
            form.parse::<ClientStatus>("status").unwrap(),
            Some(ClientStatus::Pending)
        );
        assert_eq!(form.parse_required::<i64>("job_id").unwrap(), 42);
        assert_eq!(
            form.parse::<i32>("year").unwrap_err().code,
            ErrorCode::ValidationFailed
        );
        assert_eq!(
            form.parse_required::<i64>("missing").unwrap_err().code,
            ErrorCode::RequiredField
        );
    }
}
