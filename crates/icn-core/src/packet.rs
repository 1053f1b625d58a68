//! Interest and Data packets

use std::time::Duration;

use bytes::{Bytes, BytesMut};

use crate::name::Name;
use crate::tags::PacketTags;
use crate::tlv;

/// Interest lifetime assumed when none is set explicitly
pub const DEFAULT_INTEREST_LIFETIME: Duration = Duration::from_secs(4);

/// Signature type marking a placeholder, not a real signature
pub const SIGNATURE_TYPE_FAKE: u64 = 255;

/// A named request for content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    name: Name,
    nonce: u32,
    lifetime: Duration,
    can_be_prefix: bool,
    /// Local annotations, not encoded
    pub tags: PacketTags,
}

impl Interest {
    /// Create an Interest for `name` with the default lifetime
    pub fn new(name: Name, nonce: u32) -> Self {
        Self {
            name,
            nonce,
            lifetime: DEFAULT_INTEREST_LIFETIME,
            can_be_prefix: false,
            tags: PacketTags::default(),
        }
    }

    /// Set the lifetime
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Allow the request to be satisfied by any Data under `name`
    pub fn with_can_be_prefix(mut self, can_be_prefix: bool) -> Self {
        self.can_be_prefix = can_be_prefix;
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn nonce(&self) -> u32 {
        self.nonce
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn can_be_prefix(&self) -> bool {
        self.can_be_prefix
    }

    /// Replace the nonce, e.g. when re-expressing the same request
    pub fn refresh_nonce(&mut self, nonce: u32) {
        self.nonce = nonce;
    }

    /// Encode to TLV wire format
    pub fn wire_encode(&self) -> Bytes {
        let mut inner = BytesMut::new();
        tlv::put_name(&mut inner, &self.name);
        if self.can_be_prefix {
            tlv::put_tlv(&mut inner, tlv::TLV_CAN_BE_PREFIX, &[]);
        }
        tlv::put_tlv(&mut inner, tlv::TLV_NONCE, &self.nonce.to_be_bytes());
        tlv::put_non_negative_integer(
            &mut inner,
            tlv::TLV_INTEREST_LIFETIME,
            self.lifetime.as_millis() as u64,
        );
        let mut out = BytesMut::with_capacity(inner.len() + 4);
        tlv::put_tlv(&mut out, tlv::TLV_INTEREST, &inner);
        out.freeze()
    }
}

/// Data metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaInfo {
    /// `None` means the Data never becomes stale
    pub freshness_period: Option<Duration>,
}

/// Signature metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInfo {
    pub signature_type: u64,
    pub key_locator: Option<Name>,
}

impl SignatureInfo {
    pub fn new(signature_type: u64) -> Self {
        Self {
            signature_type,
            key_locator: None,
        }
    }

    /// Attach a key locator
    pub fn with_key_locator(mut self, key_locator: Name) -> Self {
        self.key_locator = Some(key_locator);
        self
    }
}

/// Signature info plus the signature bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub info: SignatureInfo,
    pub value: Bytes,
}

impl Signature {
    /// A placeholder signature whose value is the encoding of `value`
    pub fn fake(info: SignatureInfo, value: u64) -> Self {
        Self {
            info,
            value: tlv::non_negative_integer(value),
        }
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::fake(SignatureInfo::new(SIGNATURE_TYPE_FAKE), 0)
    }
}

/// A named content reply
///
/// The wire image is computed on demand by [`Data::wire_encode`] and kept
/// until the packet is mutated through a setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    name: Name,
    meta_info: MetaInfo,
    content: Bytes,
    signature: Signature,
    wire: Option<Bytes>,
    /// Local annotations, not encoded
    pub tags: PacketTags,
}

impl Data {
    /// Create an empty Data packet named `name`
    pub fn new(name: Name) -> Self {
        Self {
            name,
            meta_info: MetaInfo::default(),
            content: Bytes::new(),
            signature: Signature::default(),
            wire: None,
            tags: PacketTags::default(),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn meta_info(&self) -> &MetaInfo {
        &self.meta_info
    }

    pub fn freshness_period(&self) -> Option<Duration> {
        self.meta_info.freshness_period
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn set_name(&mut self, name: Name) {
        self.name = name;
        self.wire = None;
    }

    pub fn set_freshness_period(&mut self, freshness: Option<Duration>) {
        self.meta_info.freshness_period = freshness;
        self.wire = None;
    }

    pub fn set_content(&mut self, content: impl Into<Bytes>) {
        self.content = content.into();
        self.wire = None;
    }

    pub fn set_signature(&mut self, signature: Signature) {
        self.signature = signature;
        self.wire = None;
    }

    /// Whether a wire image is currently cached
    pub fn has_wire(&self) -> bool {
        self.wire.is_some()
    }

    /// Length of the cached wire image
    pub fn wire_size(&self) -> Option<usize> {
        self.wire.as_ref().map(Bytes::len)
    }

    /// Encode to TLV wire format and cache the result
    pub fn wire_encode(&mut self) -> Bytes {
        if let Some(wire) = &self.wire {
            return wire.clone();
        }
        let wire = self.encode_uncached();
        self.wire = Some(wire.clone());
        wire
    }

    fn encode_uncached(&self) -> Bytes {
        let mut inner = BytesMut::with_capacity(self.content.len() + 64);
        tlv::put_name(&mut inner, &self.name);

        let mut meta = BytesMut::new();
        if let Some(freshness) = self.meta_info.freshness_period {
            tlv::put_non_negative_integer(
                &mut meta,
                tlv::TLV_FRESHNESS_PERIOD,
                freshness.as_millis() as u64,
            );
        }
        tlv::put_tlv(&mut inner, tlv::TLV_META_INFO, &meta);

        tlv::put_tlv(&mut inner, tlv::TLV_CONTENT, &self.content);

        let mut sig_info = BytesMut::new();
        tlv::put_non_negative_integer(
            &mut sig_info,
            tlv::TLV_SIGNATURE_TYPE,
            self.signature.info.signature_type,
        );
        if let Some(key_locator) = &self.signature.info.key_locator {
            let mut locator = BytesMut::new();
            tlv::put_name(&mut locator, key_locator);
            tlv::put_tlv(&mut sig_info, tlv::TLV_KEY_LOCATOR, &locator);
        }
        tlv::put_tlv(&mut inner, tlv::TLV_SIGNATURE_INFO, &sig_info);
        tlv::put_tlv(&mut inner, tlv::TLV_SIGNATURE_VALUE, &self.signature.value);

        let mut out = BytesMut::with_capacity(inner.len() + 4);
        tlv::put_tlv(&mut out, tlv::TLV_DATA, &inner);
        out.freeze()
    }
}
