//! Deterministic names for provider-side resources
//!
//! Every resource name is derived from the environment name so that two
//! environments in the same account never collide.

use crate::provider::Tag;

const PROJECT: &str = "chatanoo";
const DISPLAY_PROJECT: &str = "Chatanoo";

/// Logical name of the bucket fronted by the domain CDN
pub const CDN_BUCKET: &str = "cdn";
/// Logical name of the bucket receiving uploaded media
pub const MEDIA_INPUT_BUCKET: &str = "medias-input";
/// Logical name of the bucket holding transcoded media
pub const MEDIA_OUTPUT_BUCKET: &str = "medias-output";
/// Logical name of the role assumed by the transcoding pipeline
pub const TRANSCODER_ROLE: &str = "transcoder";

/// TTL of the CNAME pointing an alias at its distribution
pub const DNS_RECORD_TTL: u32 = 300;

pub fn bucket_name(env: &str, logical: &str) -> String {
    format!("{}-{}-{}", PROJECT, env, logical)
}

pub fn role_name(env: &str, name: &str) -> String {
    format!("{}-{}-{}-role", PROJECT, env, name)
}

pub fn policy_name(env: &str, name: &str) -> String {
    format!("{}-{}-{}-policy", PROJECT, env, name)
}

pub fn pipeline_name(env: &str) -> String {
    format!("{} - {} - Pipeline", DISPLAY_PROJECT, env)
}

pub fn preset_name(env: &str, label: &str) -> String {
    format!("{} - {} - {}", DISPLAY_PROJECT, env, label)
}

/// Public host name of a bucket served through the CDN
pub fn alias(logical: &str, domain: &str) -> String {
    format!("{}.{}", logical, domain)
}

/// Fully qualified form used by DNS APIs
pub fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

pub fn origin_id(bucket: &str) -> String {
    format!("s3-{}", bucket)
}

pub fn origin_domain(bucket: &str) -> String {
    format!("{}.s3.amazonaws.com", bucket)
}

/// Tags attached to zones and buckets
pub fn resource_tags(env: &str, role: &str) -> Vec<Tag> {
    vec![
        Tag::new(format!("{}:env", PROJECT), env),
        Tag::new(format!("{}:type", PROJECT), "production"),
        Tag::new(format!("{}:role", PROJECT), role),
    ]
}
