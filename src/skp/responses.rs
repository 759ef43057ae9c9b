use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub token: String,
    pub files: Vec<ReservationResponseFile>,
    #[serde(default)]
    pub total_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponseFile {
    pub id: String,
    pub object_id: String,
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReservationConfirmResult {
    pub result: Vec<ConfirmedTransfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedTransfer {
    pub recipient_id: String,
}

/// Answer to an uploaded chunk, `size` is what the server holds in total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadInfo {
    pub size: u64,
    pub chunk_start: Option<u64>,
    pub chunk_end: Option<u64>,
    pub total_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkpEnvironment {
    pub expiration: Expiration,
    #[serde(default)]
    pub ttl_enabled: Option<bool>,
    #[serde(default)]
    pub transfer_password_required: Option<bool>,
    #[serde(default)]
    pub product_name: Option<String>,
}

/// Allowed transfer lifetimes in days.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Expiration {
    pub values: Vec<u32>,
    pub default: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListTransfersResponse {
    #[serde(default)]
    pub total: u64,
    pub transfers: Vec<Transfer>,
}

/// A transfer as seen by one recipient. Fields the client does not use are
/// kept in `extra` so the transfer can be written back as JSON unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub recipient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub is_unread: bool,
    #[serde(default)]
    pub files: Vec<TransferFile>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transfer {
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFile {
    pub object_id: String,
    pub name: String,
    pub size: u64,
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransferLocation {
    #[default]
    Received,
    Sent,
    SentAndReceived,
}

impl TransferLocation {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Sent => "sent",
            Self::SentAndReceived => "sentandreceived",
        }
    }
}

impl fmt::Display for TransferLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "received" => Ok(Self::Received),
            "sent" => Ok(Self::Sent),
            "sentandreceived" => Ok(Self::SentAndReceived),
            _ => Err(format!("invalid location: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_response() {
        let json = r#"{
            "token": "res-token",
            "files": [
                {"id": "0", "objectId": "obj-a", "name": "a.bin", "size": 120},
                {"id": "1", "objectId": "obj-b", "name": "b.bin", "size": 0}
            ],
            "totalSize": 120
        }"#;
        let reservation: ReservationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reservation.token, "res-token");
        assert_eq!(reservation.total_size, 120);
        assert_eq!(reservation.files[0].object_id, "obj-a");
        assert_eq!(reservation.files[1].size, 0);
    }

    #[test]
    fn test_upload_info_size_only() {
        let info: UploadInfo = serde_json::from_str(r#"{"size": 50}"#).unwrap();
        assert_eq!(info.size, 50);
        assert_eq!(info.total_size, None);

        let info: UploadInfo = serde_json::from_str(
            r#"{"size": 100, "chunkStart": 50, "chunkEnd": 99, "totalSize": 120}"#,
        )
        .unwrap();
        assert_eq!(info.chunk_end, Some(99));
    }

    #[test]
    fn test_confirm_result() {
        let result: ReservationConfirmResult =
            serde_json::from_str(r#"{"result": [{"recipientId": "r-1"}]}"#).unwrap();
        assert_eq!(result.result[0].recipient_id, "r-1");
    }

    #[test]
    fn test_environment() {
        let json = r#"{
            "expiration": {"values": [3, 7, 14], "default": 7},
            "ttlEnabled": true,
            "motd": ""
        }"#;
        let env: SkpEnvironment = serde_json::from_str(json).unwrap();
        assert_eq!(env.expiration.values, vec![3, 7, 14]);
        assert_eq!(env.expiration.default, 7);
        assert_eq!(env.ttl_enabled, Some(true));
    }

    #[test]
    fn test_transfer_keeps_unknown_fields() {
        let json = r#"{
            "recipientId": "r-1",
            "subject": "hi",
            "isUnread": true,
            "sender": {"email": "a@example.com"},
            "files": [{
                "objectId": "o",
                "name": "n",
                "size": 3,
                "url": "https://x/o",
                "mimeType": "text/plain"
            }]
        }"#;
        let transfer: Transfer = serde_json::from_str(json).unwrap();
        assert!(transfer.is_unread);
        assert_eq!(transfer.total_size(), 3);
        assert!(transfer.extra.contains_key("sender"));

        let value = serde_json::to_value(&transfer).unwrap();
        assert_eq!(value["sender"]["email"], "a@example.com");
        assert_eq!(value["files"][0]["mimeType"], "text/plain");
        assert_eq!(value["recipientId"], "r-1");
    }

    #[test]
    fn test_transfer_location() {
        let test_cases = vec![
            ("received", Ok(TransferLocation::Received)),
            ("sent", Ok(TransferLocation::Sent)),
            ("SentAndReceived", Ok(TransferLocation::SentAndReceived)),
            ("inbox", Err("invalid location: inbox".to_string())),
        ];
        for (input, expected) in test_cases {
            assert_eq!(input.parse::<TransferLocation>(), expected);
        }
        assert_eq!(TransferLocation::SentAndReceived.to_string(), "sentandreceived");
    }
}
