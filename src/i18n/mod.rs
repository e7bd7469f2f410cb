//! UI language and the handful of client-side messages the client itself produces.
//!
//! Backend messages arrive already localized (the backend reads `Accept-Language`),
//! so only validation failures, fallbacks and outcome notices live here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Tr,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }

    /// Strict parse of a stored language code. Anything but `en`/`tr` is rejected.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "tr" => Some(Language::Tr),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(&s.trim().to_lowercase())
            .ok_or_else(|| format!("unsupported language '{}', expected 'en' or 'tr'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    GenericError,
    LoginSuccess,
    LoginFailed,
    RegistrationFailed,
    LoggedOut,
    ProfileUpdated,
    PasswordChanged,
    PasswordsDoNotMatch,
    FieldRequired,
    WorkspaceNameRequired,
    WorkspaceCreated,
    WorkspaceUpdated,
    WorkspaceDeleted,
    WorkspaceNotFound,
    SelectWorkspaceFirst,
    RecordDeleted,
    InvalidProductCount,
    InvalidUrl,
    SessionExpired,
}

impl Message {
    pub fn text(self, language: Language) -> &'static str {
        match (self, language) {
            (Message::GenericError, Language::En) => "An error occurred. Please try again.",
            (Message::GenericError, Language::Tr) => "Bir hata oluştu. Lütfen tekrar deneyin.",
            (Message::LoginSuccess, Language::En) => "Login successful!",
            (Message::LoginSuccess, Language::Tr) => "Giriş başarılı!",
            (Message::LoginFailed, Language::En) => "Login failed",
            (Message::LoginFailed, Language::Tr) => "Giriş başarısız",
            (Message::RegistrationFailed, Language::En) => "Registration failed",
            (Message::RegistrationFailed, Language::Tr) => "Kayıt başarısız",
            (Message::LoggedOut, Language::En) => "Logged out.",
            (Message::LoggedOut, Language::Tr) => "Çıkış yapıldı.",
            (Message::ProfileUpdated, Language::En) | (Message::PasswordChanged, Language::En) => {
                "Settings updated successfully!"
            }
            (Message::ProfileUpdated, Language::Tr) | (Message::PasswordChanged, Language::Tr) => {
                "Ayarlar başarıyla güncellendi!"
            }
            (Message::PasswordsDoNotMatch, Language::En) => "Passwords do not match",
            (Message::PasswordsDoNotMatch, Language::Tr) => "Şifreler eşleşmiyor",
            (Message::FieldRequired, Language::En) => "Please fill in all required fields.",
            (Message::FieldRequired, Language::Tr) => "Lütfen tüm zorunlu alanları doldurun.",
            (Message::WorkspaceNameRequired, Language::En) => "Workspace name is required.",
            (Message::WorkspaceNameRequired, Language::Tr) => "Çalışma alanı adı gereklidir.",
            (Message::WorkspaceCreated, Language::En) => "Workspace created successfully.",
            (Message::WorkspaceCreated, Language::Tr) => "Çalışma alanı başarıyla oluşturuldu.",
            (Message::WorkspaceUpdated, Language::En) => "Workspace updated successfully.",
            (Message::WorkspaceUpdated, Language::Tr) => "Çalışma alanı başarıyla güncellendi.",
            (Message::WorkspaceDeleted, Language::En) => "Workspace deleted successfully.",
            (Message::WorkspaceDeleted, Language::Tr) => "Çalışma alanı başarıyla silindi.",
            (Message::WorkspaceNotFound, Language::En) => "Workspace not found.",
            (Message::WorkspaceNotFound, Language::Tr) => "Çalışma alanı bulunamadı.",
            (Message::SelectWorkspaceFirst, Language::En) => "Please select a workspace first",
            (Message::SelectWorkspaceFirst, Language::Tr) => "Lütfen önce bir çalışma alanı seçin",
            (Message::RecordDeleted, Language::En) => "Deleted successfully.",
            (Message::RecordDeleted, Language::Tr) => "Başarıyla silindi.",
            (Message::InvalidProductCount, Language::En) => "Product count must be between 1 and 5.",
            (Message::InvalidProductCount, Language::Tr) => "Ürün sayısı 1 ile 5 arasında olmalıdır.",
            (Message::InvalidUrl, Language::En) => "Please enter a valid http(s) URL.",
            (Message::InvalidUrl, Language::Tr) => "Lütfen geçerli bir http(s) adresi girin.",
            (Message::SessionExpired, Language::En) => "Your session has expired. Please log in again.",
            (Message::SessionExpired, Language::Tr) => {
                "Oturumunuzun süresi doldu. Lütfen tekrar giriş yapın."
            }
        }
    }
}
