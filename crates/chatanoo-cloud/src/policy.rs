//! IAM policy documents

use crate::error::{CloudError, Result};
use serde_json::json;

/// Trust document letting the compute service assume a role
pub fn trust_document() -> String {
    json!({
        "Version": "2008-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": ["ec2.amazonaws.com"] },
            "Action": ["sts:AssumeRole"]
        }]
    })
    .to_string()
}

/// Permissions for the transcoding pipeline role
///
/// Storage read/write and notification publishing are allowed; the trailing
/// deny statement overrides the wildcards for anything destructive or
/// permission-related.
pub fn transcoder_policy() -> String {
    let policy = json!({
        "Version": "2012-10-17",
        "Statement": [
            {
                "Sid": "1",
                "Effect": "Allow",
                "Action": [
                    "s3:ListBucket",
                    "s3:Put*",
                    "s3:Get*",
                    "s3:*MultipartUpload*"
                ],
                "Resource": ["*"]
            },
            {
                "Sid": "2",
                "Effect": "Allow",
                "Action": ["sns:Publish"],
                "Resource": ["*"]
            },
            {
                "Sid": "3",
                "Effect": "Deny",
                "Action": [
                    "s3:*Policy*",
                    "sns:*Permission*",
                    "sns:*Delete*",
                    "s3:*Delete*",
                    "sns:*Remove*"
                ],
                "Resource": ["*"]
            }
        ]
    });

    policy.to_string()
}

/// Reject documents that are not a JSON object with a `Statement` entry
pub fn validate_document(document: &str) -> Result<()> {
    let value: serde_json::Value = serde_json::from_str(document)
        .map_err(|e| CloudError::InvalidInput(format!("policy document is not JSON: {}", e)))?;

    if value.get("Statement").is_none() {
        return Err(CloudError::InvalidInput(
            "policy document has no Statement".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_transcoder_policy_denies_destructive_actions() {
        let policy: serde_json::Value = serde_json::from_str(&transcoder_policy()).unwrap();
        let statements = policy["Statement"].as_array().unwrap();
        assert_eq!(statements.len(), 3);

        let deny = &statements[2];
        assert_eq!(deny["Effect"], "Deny");
        let actions: Vec<_> = deny["Action"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a.as_str().unwrap())
            .collect();
        assert!(actions.contains(&"s3:*Delete*"));
        assert!(actions.contains(&"sns:*Permission*"));
    }

    #[test]
    fn test_trust_document_principal() {
        let trust: serde_json::Value = serde_json::from_str(&trust_document()).unwrap();
        assert_eq!(
            trust["Statement"][0]["Principal"]["Service"][0],
            "ec2.amazonaws.com"
        );
    }

    #[test]
    fn test_validate_document() {
        assert!(validate_document(&transcoder_policy()).is_ok());

        let err = validate_document("not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = validate_document(r#"{"Version":"2012-10-17"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
