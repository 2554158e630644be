use serde::{Deserialize, Serialize};

use super::err::AppError;

/// A student record as returned by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    // assigned by the store on creation, immutable
    pub id: String,
    // student code
    pub mssv: String,
    // full name
    pub hoten: String,
    // class
    pub lop: String,
    // photo url, may be empty
    pub hinhanh: String,
}

/// The four writable fields, sent as the create/update payload.
/// Never carries an `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentFields {
    pub mssv: String,
    pub hoten: String,
    pub lop: String,
    pub hinhanh: String,
}

impl Student {
    pub fn new(id: String, mssv: String, hoten: String, lop: String, hinhanh: String) -> Self {
        Self {
            id,
            mssv,
            hoten,
            lop,
            hinhanh,
        }
    }
}

impl StudentFields {
    pub fn new(mssv: String, hoten: String, lop: String, hinhanh: String) -> Self {
        Self {
            mssv,
            hoten,
            lop,
            hinhanh,
        }
    }

    /// Required-field check. `hinhanh` may stay empty (no photo).
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in [
            ("mssv", &self.mssv),
            ("hoten", &self.hoten),
            ("lop", &self.lop),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::MissingField(name));
            }
        }
        Ok(())
    }
}

impl From<Student> for StudentFields {
    fn from(student: Student) -> Self {
        Self {
            mssv: student.mssv,
            hoten: student.hoten,
            lop: student.lop,
            hinhanh: student.hinhanh,
        }
    }
}
