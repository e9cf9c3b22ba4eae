// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! NFC Data Exchange Format (NDEF) messages.
//!
//! Record layout (NFC Forum NDEF 1.0):
//!
//! ```text
//! header: MB ME CF SR IL TNF(3)
//! type length:    u8
//! payload length: u8 when SR, otherwise u32 big-endian
//! id length:      u8, present only when IL
//! type, id, payload
//! ```
//!
//! Chunked payloads (CF) are reassembled into one logical record on parse.

use crate::TransportError;

const FLAG_MB: u8 = 0x80;
const FLAG_ME: u8 = 0x40;
const FLAG_CF: u8 = 0x20;
const FLAG_SR: u8 = 0x10;
const FLAG_IL: u8 = 0x08;
const TNF_MASK: u8 = 0x07;

/// Type Name Format of a record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tnf {
    Empty,
    WellKnown,
    MimeMedia,
    AbsoluteUri,
    External,
    Unknown,
    Unchanged,
    Reserved,
}

impl Tnf {
    fn from_bits(bits: u8) -> Self {
        match bits & TNF_MASK {
            0 => Self::Empty,
            1 => Self::WellKnown,
            2 => Self::MimeMedia,
            3 => Self::AbsoluteUri,
            4 => Self::External,
            5 => Self::Unknown,
            6 => Self::Unchanged,
            _ => Self::Reserved,
        }
    }

    fn bits(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::WellKnown => 1,
            Self::MimeMedia => 2,
            Self::AbsoluteUri => 3,
            Self::External => 4,
            Self::Unknown => 5,
            Self::Unchanged => 6,
            Self::Reserved => 7,
        }
    }
}

fn malformed(msg: impl Into<String>) -> TransportError {
    TransportError::MalformedNdef(msg.into())
}

/// One logical NDEF record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    tnf: Tnf,
    record_type: Vec<u8>,
    id: Vec<u8>,
    payload: Vec<u8>,
}

impl NdefRecord {
    /// Build a record.
    ///
    /// `Unchanged` and `Reserved` only occur on the wire and are rejected, as
    /// are type or id fields longer than 255 bytes. An `Empty` record carries
    /// no type, id or payload.
    pub fn new(
        tnf: Tnf,
        record_type: impl Into<Vec<u8>>,
        id: impl Into<Vec<u8>>,
        payload: impl Into<Vec<u8>>,
    ) -> Result<Self, TransportError> {
        let record = Self {
            tnf,
            record_type: record_type.into(),
            id: id.into(),
            payload: payload.into(),
        };

        if matches!(tnf, Tnf::Unchanged | Tnf::Reserved) {
            return Err(malformed(format!("TNF {tnf:?} cannot start a record")));
        }
        if tnf == Tnf::Empty && !(record.record_type.is_empty() && record.id.is_empty() && record.payload.is_empty()) {
            return Err(malformed("empty record carries data"));
        }
        if record.record_type.len() > usize::from(u8::MAX) || record.id.len() > usize::from(u8::MAX) {
            return Err(malformed("record type or id longer than 255 bytes"));
        }
        if u32::try_from(record.payload.len()).is_err() {
            return Err(malformed("payload longer than 4 GiB"));
        }
        Ok(record)
    }

    /// A MIME media record, as used for mdoc handover payloads.
    pub fn mime(media_type: &str, payload: impl Into<Vec<u8>>) -> Result<Self, TransportError> {
        Self::new(Tnf::MimeMedia, media_type.as_bytes(), Vec::new(), payload)
    }

    pub fn tnf(&self) -> Tnf {
        self.tnf
    }

    pub fn record_type(&self) -> &[u8] {
        &self.record_type
    }

    pub fn id(&self) -> &[u8] {
        &self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// An ordered list of NDEF records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NdefMessage {
    records: Vec<NdefRecord>,
}

impl NdefMessage {
    pub fn new(records: Vec<NdefRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Decode a binary NDEF message.
    pub fn parse(bytes: &[u8]) -> Result<Self, TransportError> {
        if bytes.is_empty() {
            return Err(malformed("empty message"));
        }

        let mut reader = Reader { bytes, pos: 0 };
        let mut records = Vec::new();
        let mut chunked: Option<NdefRecord> = None;

        for index in 0usize.. {
            let header = reader.u8()?;
            let tnf = Tnf::from_bits(header);
            let has_mb = header & FLAG_MB != 0;
            if (index == 0) != has_mb {
                return Err(malformed(format!("MB flag misplaced on record {index}")));
            }

            let type_len = usize::from(reader.u8()?);
            let payload_len = if header & FLAG_SR != 0 {
                usize::from(reader.u8()?)
            } else {
                let raw: [u8; 4] = reader
                    .take(4)?
                    .try_into()
                    .map_err(|_| malformed("truncated payload length"))?;
                usize::try_from(u32::from_be_bytes(raw)).map_err(|_| malformed("payload length overflow"))?
            };
            let id_len = if header & FLAG_IL != 0 { usize::from(reader.u8()?) } else { 0 };

            let record_type = reader.take(type_len)?;
            let id = reader.take(id_len)?;
            let payload = reader.take(payload_len)?;
            let continues = header & FLAG_CF != 0;

            if tnf == Tnf::Reserved {
                return Err(malformed(format!("reserved TNF on record {index}")));
            }
            if tnf == Tnf::Empty && (type_len != 0 || id_len != 0 || payload_len != 0) {
                return Err(malformed(format!("empty record {index} carries data")));
            }

            match chunked.take() {
                None => {
                    if tnf == Tnf::Unchanged {
                        return Err(malformed(format!("record {index} has TNF unchanged outside a chunk")));
                    }
                    let record = NdefRecord {
                        tnf,
                        record_type: record_type.to_vec(),
                        id: id.to_vec(),
                        payload: payload.to_vec(),
                    };
                    if continues {
                        chunked = Some(record);
                    } else {
                        records.push(record);
                    }
                }
                Some(mut first) => {
                    if tnf != Tnf::Unchanged || type_len != 0 || header & FLAG_IL != 0 {
                        return Err(malformed(format!(
                            "chunk {index} must have TNF unchanged and no type or id"
                        )));
                    }
                    first.payload.extend_from_slice(payload);
                    if continues {
                        chunked = Some(first);
                    } else {
                        records.push(first);
                    }
                }
            }

            if header & FLAG_ME != 0 {
                if chunked.is_some() {
                    return Err(malformed("message ends inside a chunked record"));
                }
                if !reader.is_empty() {
                    return Err(malformed("trailing bytes after the last record"));
                }
                break;
            }
            if reader.is_empty() {
                return Err(malformed("message ends without ME flag"));
            }
        }

        tracing::trace!(records = records.len(), len = bytes.len(), "parsed NDEF message");
        Ok(Self { records })
    }

    /// Encode as a binary NDEF message. Records are never chunked; short
    /// record form is used when the payload fits one length byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let last = self.records.len().saturating_sub(1);

        for (index, record) in self.records.iter().enumerate() {
            let short = record.payload.len() <= usize::from(u8::MAX);
            let mut header = record.tnf.bits();
            if index == 0 {
                header |= FLAG_MB;
            }
            if index == last {
                header |= FLAG_ME;
            }
            if short {
                header |= FLAG_SR;
            }
            if !record.id.is_empty() {
                header |= FLAG_IL;
            }

            // Field lengths were bounded in `NdefRecord::new`.
            out.push(header);
            out.push(record.record_type.len() as u8);
            if short {
                out.push(record.payload.len() as u8);
            } else {
                out.extend_from_slice(&(record.payload.len() as u32).to_be_bytes());
            }
            if !record.id.is_empty() {
                out.push(record.id.len() as u8);
            }
            out.extend_from_slice(&record.record_type);
            out.extend_from_slice(&record.id);
            out.extend_from_slice(&record.payload);
        }
        out
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn u8(&mut self) -> Result<u8, TransportError> {
        self.take(1)?.first().copied().ok_or_else(|| malformed("truncated record"))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], TransportError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| malformed("truncated record"))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}
