//! IRIs and prefixes of the RDF vocabularies the repository speaks.

/// Namespace of the EBUCore ontology.
pub const EBUCORE_NS: &str = "http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#";

pub const EBUCORE_FILENAME: &str = "http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#filename";

pub const EBUCORE_HAS_MIME_TYPE: &str =
    "http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#hasMimeType";

pub const PREMIS_HAS_SIZE: &str = "http://www.loc.gov/premis/rdf/v1#hasSize";

pub const PREMIS_HAS_MESSAGE_DIGEST: &str = "http://www.loc.gov/premis/rdf/v1#hasMessageDigest";

pub const XSD_LONG: &str = "http://www.w3.org/2001/XMLSchema#long";

/// Prefix of the digest IRI, e.g. `urn:sha-512:71d0...`.
pub const SHA512_URN_PREFIX: &str = "urn:sha-512:";

/// Media type of SPARQL update bodies.
pub const SPARQL_UPDATE: &str = "application/sparql-update";

/// Media type of JSON-LD descriptions.
pub const LD_JSON: &str = "application/ld+json";
