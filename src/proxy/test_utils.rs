//! Test utilities for proxy module testing

#[cfg(test)]
pub mod test_helpers {
    use crate::domain::{AdType, AuctionConfig, DspExtension, PublisherId, SlotTable};
    use crate::proxy::types::{DispatchError, ProxyConfig, RequestSizeLimit, TargetUrl};
    use crate::proxy::BidTransport;
    use async_trait::async_trait;
    use bytes::Bytes;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    pub const TEST_BIDDER_URL: &str = "http://pbs.test/openrtb2/auction";
    pub const TEST_DSP_URL: &str = "https://dsp.test/jiodsp/?spid=51";

    /// Auction configuration with the production slot tables
    pub fn test_auction_config(bidder_url: &str, dsp_url: &str) -> AuctionConfig {
        let mappings = HashMap::from([(
            "com.truecaller".to_string(),
            HashMap::from([
                (AdType::Banner, "6931445".to_string()),
                (AdType::Video, "6931468".to_string()),
                (AdType::Native, "6931469".to_string()),
            ]),
        )]);
        let fallback = HashMap::from([
            (AdType::Banner, "default_banner_slot".to_string()),
            (AdType::Video, "default_video_slot".to_string()),
            (AdType::Native, "default_native_slot".to_string()),
        ]);

        AuctionConfig {
            publisher_id: PublisherId::new("156209".to_string()),
            bidder_url: TargetUrl::try_new(bidder_url.to_string())
                .expect("test bidder URL should be valid"),
            dsp_url: TargetUrl::try_new(dsp_url.to_string())
                .expect("test DSP URL should be valid"),
            dsp_extension: DspExtension {
                ssp: "abc".to_string(),
                spid: "51".to_string(),
            },
            slots: SlotTable::from_raw(mappings, fallback).expect("test slots should be valid"),
        }
    }

    /// Proxy configuration with a small request limit
    pub fn test_proxy_config() -> ProxyConfig {
        ProxyConfig {
            max_request_size: RequestSizeLimit::try_new(64 * 1024).expect("64KB is valid"),
        }
    }

    /// OpenRTB bid response with a single bid
    pub fn bid_response(price: f64) -> Value {
        json!({
            "id": "auction-1",
            "seatbid": [{
                "seat": "seat-1",
                "bid": [{ "id": "bid-1", "impid": "1", "price": price, "adm": "<div/>" }]
            }],
            "cur": "USD"
        })
    }

    /// Inbound request with one banner impression
    pub fn banner_request(bundle: &str) -> Value {
        json!({
            "id": "req-1",
            "imp": [{ "id": "1", "banner": { "w": 320, "h": 50 } }],
            "app": { "bundle": bundle },
            "device": { "ua": "Mozilla/5.0" }
        })
    }

    /// In-memory transport that answers per endpoint and records what was sent
    #[derive(Default)]
    pub struct RecordingTransport {
        replies: HashMap<String, (Option<Value>, Duration)>,
        sent: Mutex<Vec<(String, Value)>>,
        calls: AtomicUsize,
    }

    impl RecordingTransport {
        /// `None` makes the endpoint fail at the transport level
        pub fn reply(self, endpoint: &str, body: Option<Value>) -> Self {
            self.reply_after(endpoint, body, Duration::ZERO)
        }

        /// Like [`reply`](Self::reply), but the endpoint answers only after `delay`
        pub fn reply_after(mut self, endpoint: &str, body: Option<Value>, delay: Duration) -> Self {
            self.replies.insert(endpoint.to_string(), (body, delay));
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn sent_to(&self, endpoint: &str) -> Option<Value> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .find(|(url, _)| url == endpoint)
                .map(|(_, body)| body.clone())
        }
    }

    #[async_trait]
    impl BidTransport for RecordingTransport {
        async fn post_json(
            &self,
            endpoint: &TargetUrl,
            body: Bytes,
        ) -> Result<Bytes, DispatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let url = endpoint.to_string();
            let sent: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            self.sent.lock().unwrap().push((url.clone(), sent));

            let Some((reply, delay)) = self.replies.get(&url) else {
                return Err(DispatchError::Status(502));
            };
            tokio::time::sleep(*delay).await;

            match reply {
                Some(reply) => Ok(Bytes::from(reply.to_string())),
                None => Err(DispatchError::Status(504)),
            }
        }
    }
}
