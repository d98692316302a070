use serde::Serialize;

#[derive(Serialize, Clone)]
struct UsageInfo {
    note: String,
    #[serde(rename = "GET /")]
    json: String,
    #[serde(rename = "GET /ip")]
    text: String,
}

#[derive(Serialize, Clone)]
struct Info {
    note: String,
    #[serde(rename = "usageInfo")]
    usage_info: UsageInfo,
    #[serde(rename = "trustForwarded")]
    trust_forwarded: bool,
    build: Build,
}

#[derive(Serialize, Clone)]
struct Build {
    version: String,
    #[serde(rename = "buildAt")]
    timestamp: String,
    #[serde(rename = "target")]
    target: String,
    #[serde(rename = "rustc")]
    rustc: String,
}

#[derive(Serialize, Clone)]
pub struct Response {
    success: bool,
    info: Info,
}

pub fn info_response(trust_forwarded: bool) -> Response {
    Response {
        success: true,
        info: Info {
            note: "Remote IP echo service online".to_string(),
            usage_info: UsageInfo {
                note: "Reports the originating client address, honouring CF-Connecting-IP \
                       first and X-Forwarded-For second."
                    .to_string(),
                json: "Forwarding chain summary: count, first, second, last and source."
                    .to_string(),
                text: "First address of the forwarding chain as plain text.".to_string(),
            },
            trust_forwarded,
            build: Build {
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: env!("VERGEN_BUILD_TIMESTAMP").to_string(),
                target: env!("VERGEN_CARGO_TARGET_TRIPLE").to_string(),
                rustc: env!("VERGEN_RUSTC_SEMVER").to_string(),
            },
        },
    }
}
