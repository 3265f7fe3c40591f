use protobuf::{CodedInputStream, CodedOutputStream};
use protobuf::wire_format::WireType;
use crate::access::tours::Tour;
use crate::errors::StateError;

///
/// Stored form of a Tour, encoded with protobuf wire format:
///
/// ```protobuf
/// message TourRecord {
///   string id = 1;
///   string name = 2;
///   string duration = 3;
///   string image = 4;
///   uint64 update_timestamp = 5;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct TourRecord {
    pub tour: Tour,
    pub update_timestamp: u64,
}

impl TourRecord {
    pub fn write_to_bytes(&self) -> Result<Vec<u8>, StateError> {
        let mut buf = Vec::new();
        {
            let mut os = CodedOutputStream::vec(&mut buf);
            os.write_string(1, &self.tour.id)?;
            os.write_string(2, &self.tour.name)?;
            os.write_string(3, &self.tour.duration)?;
            os.write_string(4, &self.tour.image)?;
            os.write_uint64(5, self.update_timestamp)?;
            os.flush()?;
        }
        Ok(buf)
    }

    pub fn parse_from_bytes(bytes: &[u8]) -> Result<TourRecord, StateError> {
        let mut is = CodedInputStream::from_bytes(bytes);
        let mut record = TourRecord::default();
        while !is.eof()? {
            let (field, wire_type) = is.read_tag_unpack()?;
            match (field, wire_type) {
                (1, WireType::WireTypeLengthDelimited) => record.tour.id = is.read_string()?,
                (2, WireType::WireTypeLengthDelimited) => record.tour.name = is.read_string()?,
                (3, WireType::WireTypeLengthDelimited) => record.tour.duration = is.read_string()?,
                (4, WireType::WireTypeLengthDelimited) => record.tour.image = is.read_string()?,
                (5, WireType::WireTypeVarint) => record.update_timestamp = is.read_uint64()?,
                // written by a newer version
                (_, other) => { let _ = is.read_unknown(other)?; }
            }
        }
        if record.tour.id.is_empty() || record.tour.name.is_empty() {
            return Err(StateError::CorruptedValue)
        }
        Ok(record)
    }
}

///
/// List of index keys that belong to a single item:
///
/// ```protobuf
/// message IndexRefs {
///   repeated string keys = 1;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct IndexRefs {
    pub keys: Vec<String>,
}

impl IndexRefs {
    pub fn write_to_bytes(&self) -> Result<Vec<u8>, StateError> {
        let mut buf = Vec::new();
        {
            let mut os = CodedOutputStream::vec(&mut buf);
            for key in &self.keys {
                os.write_string(1, key)?;
            }
            os.flush()?;
        }
        Ok(buf)
    }

    pub fn parse_from_bytes(bytes: &[u8]) -> Result<IndexRefs, StateError> {
        let mut is = CodedInputStream::from_bytes(bytes);
        let mut refs = IndexRefs::default();
        while !is.eof()? {
            let (field, wire_type) = is.read_tag_unpack()?;
            match (field, wire_type) {
                (1, WireType::WireTypeLengthDelimited) => refs.keys.push(is.read_string()?),
                (_, other) => { let _ = is.read_unknown(other)?; }
            }
        }
        Ok(refs)
    }
}

#[cfg(test)]
mod tests {
    use crate::access::tours::Tour;
    use crate::errors::StateError;
    use super::{IndexRefs, TourRecord};

    fn everest() -> TourRecord {
        TourRecord {
            tour: Tour {
                id: "989d7648-13e3-4cb9-acfb-85464f063b34".to_string(),
                name: "Everest Base Camp Trek".to_string(),
                duration: "14 days".to_string(),
                image: "https://cdn.example.com/ebc.jpg".to_string(),
            },
            update_timestamp: 1_647_313_850_992,
        }
    }

    #[test]
    fn encodes_as_protobuf() {
        let record = TourRecord {
            tour: Tour {
                id: "a".to_string(),
                name: "b".to_string(),
                duration: String::new(),
                image: String::new(),
            },
            update_timestamp: 1,
        };
        let bytes = record.write_to_bytes().unwrap();
        assert_eq!(bytes, vec![
            0x0a, 0x01, b'a',
            0x12, 0x01, b'b',
            0x1a, 0x00,
            0x22, 0x00,
            0x28, 0x01,
        ]);
    }

    #[test]
    fn decodes_written() {
        let record = everest();
        let bytes = record.write_to_bytes().unwrap();
        assert_eq!(TourRecord::parse_from_bytes(bytes.as_slice()), Ok(record));
    }

    #[test]
    fn skips_unknown_fields() {
        let mut bytes = everest().write_to_bytes().unwrap();
        // field 9, varint 150
        bytes.extend_from_slice(&[0x48, 0x96, 0x01]);
        // field 10, string "x"
        bytes.extend_from_slice(&[0x52, 0x01, b'x']);
        assert_eq!(TourRecord::parse_from_bytes(bytes.as_slice()), Ok(everest()));
    }

    #[test]
    fn fails_on_missing_name() {
        // only id is set
        let bytes = vec![0x0a, 0x01, b'a'];
        assert_eq!(TourRecord::parse_from_bytes(bytes.as_slice()), Err(StateError::CorruptedValue));
    }

    #[test]
    fn fails_on_truncated() {
        let bytes = everest().write_to_bytes().unwrap();
        let result = TourRecord::parse_from_bytes(&bytes[0..10]);
        assert_eq!(result, Err(StateError::CorruptedValue));
    }

    #[test]
    fn keeps_index_refs() {
        let refs = IndexRefs {
            keys: vec!["idx:tour:1/Annapurna".to_string(), "idx:tour:1/Everest".to_string()],
        };
        let bytes = refs.write_to_bytes().unwrap();
        assert_eq!(IndexRefs::parse_from_bytes(bytes.as_slice()), Ok(refs));
        assert_eq!(IndexRefs::parse_from_bytes(&[]), Ok(IndexRefs::default()));
    }
}
