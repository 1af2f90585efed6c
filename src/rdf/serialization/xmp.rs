//! XMP packet handling

use thiserror::Error;

const RDF_OPEN: &str = "<rdf:RDF";
const RDF_CLOSE: &str = "</rdf:RDF>";

/// XMP packet errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PacketError {
    /// No complete `<rdf:RDF>` block in the packet
    #[error("Malformed XMP packet: {0}")]
    MalformedPacket(&'static str),
}

pub type PacketResult<T> = Result<T, PacketError>;

/// Slice the RDF/XML block out of an XMP packet.
///
/// The block runs from the first `<rdf:RDF` to the end of the last
/// `</rdf:RDF>`, both markers included.
pub fn extract_rdf_block(packet: &str) -> PacketResult<&str> {
    let start = packet
        .find(RDF_OPEN)
        .ok_or(PacketError::MalformedPacket("missing <rdf:RDF> start tag"))?;
    let end = packet
        .rfind(RDF_CLOSE)
        .ok_or(PacketError::MalformedPacket("missing </rdf:RDF> end tag"))?;

    if end < start {
        return Err(PacketError::MalformedPacket("</rdf:RDF> precedes <rdf:RDF>"));
    }

    Ok(&packet[start..end + RDF_CLOSE.len()])
}
