//! Jio DSP
//!
//! Receives the inbound request with `ext.ssp` and `ext.spid` set at the top level.

use crate::demand::DemandSource;
use crate::domain::openrtb::{BidRequest, Shaped};
use crate::domain::{DemandSourceId, DspExtension};
use crate::proxy::types::{ProxyResult, TargetUrl};
use serde_json::Value;
use tracing::info;

pub struct JioSource {
    endpoint: TargetUrl,
    extension: DspExtension,
}

impl JioSource {
    pub fn new(endpoint: TargetUrl, extension: DspExtension) -> Self {
        Self {
            endpoint,
            extension,
        }
    }
}

impl DemandSource for JioSource {
    fn id(&self) -> DemandSourceId {
        DemandSourceId::Jio
    }

    fn endpoint(&self) -> &TargetUrl {
        &self.endpoint
    }

    fn transform(&self, request: &mut BidRequest) -> ProxyResult<()> {
        inject_dsp_extension(request, &self.extension);
        Ok(())
    }
}

/// Set `ext.ssp` and `ext.spid`, keeping every other key already under `ext`.
pub fn inject_dsp_extension(request: &mut BidRequest, extension: &DspExtension) {
    let mut ext = Shaped::take_typed(&mut request.ext);

    ext.insert("ssp".to_string(), Value::String(extension.ssp.clone()));
    ext.insert("spid".to_string(), Value::String(extension.spid.clone()));

    info!(ext = ?ext, "Injected Jio ext");

    request.ext = Some(Shaped::Typed(ext));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extension() -> DspExtension {
        DspExtension {
            ssp: "abc".to_string(),
            spid: "51".to_string(),
        }
    }

    fn inject(value: Value) -> Value {
        let mut request: BidRequest = serde_json::from_value(value).unwrap();
        inject_dsp_extension(&mut request, &extension());
        serde_json::to_value(&request).unwrap()
    }

    #[test]
    fn test_creates_ext_when_missing() {
        let result = inject(json!({ "id": "r1", "imp": [{ "banner": {} }] }));

        assert_eq!(result["ext"], json!({ "ssp": "abc", "spid": "51" }));
        assert!(result["imp"][0].get("ext").is_none());
    }

    #[test]
    fn test_preserves_existing_ext_keys() {
        let result = inject(json!({
            "ext": { "gdpr": 1, "prebid": { "debug": true }, "ssp": "stale" }
        }));

        assert_eq!(
            result["ext"],
            json!({ "gdpr": 1, "prebid": { "debug": true }, "ssp": "abc", "spid": "51" })
        );
    }

    #[test]
    fn test_wrong_shaped_ext_is_replaced() {
        let result = inject(json!({ "ext": "opaque" }));
        assert_eq!(result["ext"], json!({ "ssp": "abc", "spid": "51" }));
    }

    #[test]
    fn test_transform_through_trait() {
        let source = JioSource::new(
            TargetUrl::try_new("https://mercury-dsp.jio.com/jiodsp/?spid=51".to_string()).unwrap(),
            extension(),
        );
        let request = BidRequest::from_slice(br#"{"id":"r1","imp":[]}"#).unwrap();

        let body = source.prepare_request(&request).unwrap();
        let sent: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(source.id(), DemandSourceId::Jio);
        assert_eq!(sent, json!({ "id": "r1", "imp": [], "ext": { "ssp": "abc", "spid": "51" } }));
    }
}
