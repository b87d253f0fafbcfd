/// Protocol constants shared by the request builder and the response parser

pub const CSW_SERVICE: &str = "CSW";
pub const CSW_VERSION: &str = "2.0.2";
pub const FILTER_VERSION: &str = "1.1.0";
pub const GET_RECORD_BY_ID: &str = "GetRecordById";

pub const XML_CONTENT_TYPE: &str = "application/xml";

// Namespaces declared on every outgoing GetRecords body
pub const NS_CSW: &str = "http://www.opengis.net/cat/csw/2.0.2";
pub const NS_OGC: &str = "http://www.opengis.net/ogc";
pub const NS_GML: &str = "http://www.opengis.net/gml";
pub const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
pub const NS_DCT: &str = "http://purl.org/dc/terms/";
pub const NS_GMD: &str = "http://www.isotc211.org/2005/gmd";
pub const NS_GCO: &str = "http://www.isotc211.org/2005/gco";
pub const NS_GMI: &str = "http://www.isotc211.org/2005/gmi";
pub const NS_OWS: &str = "http://www.opengis.net/ows";

/// Prefix/URI pairs in the order they are declared on `csw:GetRecords`
pub const REQUEST_NAMESPACES: [(&str, &str); 9] = [
    ("csw", NS_CSW),
    ("ogc", NS_OGC),
    ("gml", NS_GML),
    ("dc", NS_DC),
    ("dct", NS_DCT),
    ("gmd", NS_GMD),
    ("gco", NS_GCO),
    ("gmi", NS_GMI),
    ("ows", NS_OWS),
];

pub const DEFAULT_CRS: &str = "EPSG:4326";

/// Message used when an ExceptionReport carries no exception text
pub const GENERIC_ERROR: &str = "GenericError";

/// Dublin Core element holding link-type values
pub const DC_REFERENCES: &str = "references";

pub const DATASET_TYPE: &str = "dataset";
