//! Producer role: answers Interests with synthesized Data

use bytes::Bytes;
use icn_core::{Data, Interest, Name, NodeId, SIGNATURE_TYPE_FAKE, Signature, SignatureInfo};
use tracing::info;

use crate::config::PeerConfig;
use crate::host::Transport;
use crate::observer::ObserverSet;

/// State owned by the producer half of a peer
#[derive(Debug, Clone)]
pub struct ProducerRole {
    prefix: Name,
    postfix: Name,
    freshness: Option<std::time::Duration>,
    payload: Bytes,
    signature_value: u64,
    key_locator: Option<Name>,
}

impl ProducerRole {
    pub fn new(config: &PeerConfig) -> Self {
        Self {
            prefix: config.producer_prefix.clone(),
            postfix: config.postfix.clone(),
            freshness: (!config.freshness.is_zero()).then_some(config.freshness),
            payload: Bytes::from(vec![0u8; config.payload_size]),
            signature_value: u64::from(config.signature),
            key_locator: (!config.key_locator.is_empty()).then(|| config.key_locator.clone()),
        }
    }

    /// Build the reply to `interest`
    ///
    /// The reply carries the Interest's exact name and is wire-encoded
    /// before it is returned.
    pub fn make_data(&self, interest: &Interest) -> Data {
        let mut data = Data::new(interest.name().clone());
        data.set_freshness_period(self.freshness);
        data.set_content(self.payload.clone());

        let mut info = SignatureInfo::new(SIGNATURE_TYPE_FAKE);
        if let Some(key_locator) = &self.key_locator {
            info = info.with_key_locator(key_locator.clone());
        }
        data.set_signature(Signature::fake(info, self.signature_value));

        data.wire_encode();
        data
    }

    pub(crate) fn respond<H: Transport + ?Sized>(
        &self,
        node: NodeId,
        interest: &Interest,
        observers: &mut ObserverSet,
        host: &mut H,
    ) {
        let data = self.make_data(interest);
        info!(%node, name = %data.name(), size = ?data.wire_size(), "Responding with Data");
        observers.each(|o| o.on_data_sent(node, &data));
        host.deliver_data(data);
    }

    pub fn prefix(&self) -> &Name {
        &self.prefix
    }

    /// Configured postfix; replies are not extended with it
    pub fn postfix(&self) -> &Name {
        &self.postfix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn interest(uri: &str) -> Interest {
        Interest::new(uri.parse().unwrap(), 1)
    }

    #[test]
    fn test_reply_name_and_payload() {
        let config = PeerConfig::producer_only("/p".parse().unwrap()).with_payload_size(300);
        let producer = ProducerRole::new(&config);
        let data = producer.make_data(&interest("/p/x/17"));

        assert_eq!(data.name().to_string(), "/p/x/17");
        assert_eq!(data.content().len(), 300);
        assert!(data.has_wire());
    }

    #[test]
    fn test_freshness() {
        let producer = ProducerRole::new(&PeerConfig::default());
        assert_eq!(producer.make_data(&interest("/a")).freshness_period(), None);

        let config = PeerConfig::default().with_freshness(Duration::from_millis(2500));
        let producer = ProducerRole::new(&config);
        assert_eq!(
            producer.make_data(&interest("/a")).freshness_period(),
            Some(Duration::from_millis(2500))
        );
    }

    #[test]
    fn test_signature() {
        let producer = ProducerRole::new(&PeerConfig::default());
        let data = producer.make_data(&interest("/a"));
        assert_eq!(data.signature().info.signature_type, SIGNATURE_TYPE_FAKE);
        assert_eq!(data.signature().info.key_locator, None);
        assert_eq!(data.signature().value.as_ref(), &[0u8]);

        let config = PeerConfig::default()
            .with_signature(0x1234)
            .with_key_locator("/key/1".parse().unwrap());
        let producer = ProducerRole::new(&config);
        let data = producer.make_data(&interest("/a"));
        assert_eq!(
            data.signature().info.key_locator,
            Some("/key/1".parse().unwrap())
        );
        assert_eq!(data.signature().value.as_ref(), &[0x12, 0x34]);
    }

    #[test]
    fn test_empty_name_accepted() {
        let producer = ProducerRole::new(&PeerConfig::default().with_payload_size(0));
        let data = producer.make_data(&Interest::new(Name::root(), 0));
        assert!(data.name().is_empty());
        assert!(data.content().is_empty());
    }
}
