//! quick-xml adapter: turns raw KML into a lazy sequence of features.

use crate::machine::KmlMachine;
use kmlstream_core::{ConverterOptions, Feature, KmlError, Result};
use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::name::QName;
use quick_xml::Reader;
use std::io::{BufRead, BufReader, Read};
use tracing::debug;

/// Streams features out of a KML document.
///
/// XML is only pulled from the source until the next placemark closes, so a
/// consumer can stop or pause between features without losing state. The
/// first tokenizer error is yielded once and ends the iteration.
///
/// # Example
///
/// ```
/// use kmlstream_parser::KmlReader;
///
/// let kml = r#"<kml><Placemark><name>A</name><Point><coordinates>1,2,0</coordinates></Point></Placemark></kml>"#;
/// let features: Vec<_> = KmlReader::new(kml.as_bytes()).collect::<Result<_, _>>().unwrap();
/// assert_eq!(features.len(), 1);
/// ```
pub struct KmlReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    machine: KmlMachine,
    options: ConverterOptions,
    done: bool,
}

impl<R: BufRead> KmlReader<R> {
    /// Creates a reader with default options.
    pub fn new(source: R) -> Self {
        Self::with_options(source, ConverterOptions::default())
    }

    pub fn with_options(source: R, options: ConverterOptions) -> Self {
        let mut reader = Reader::from_reader(source);
        // <Point/> arrives as open + close
        reader.config_mut().expand_empty_elements = true;

        Self {
            reader,
            buf: Vec::with_capacity(options.buffer_capacity),
            machine: KmlMachine::new(),
            options,
            done: false,
        }
    }

    /// Number of features produced so far.
    pub fn emitted(&self) -> usize {
        self.machine.emitted()
    }

    /// Reads XML events until the next feature completes or input ends.
    pub fn next_feature(&mut self) -> Result<Option<Feature>> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                XmlEvent::Start(element) => {
                    let name = element_name(element.name());
                    let attributes = element_attributes(&element)?;
                    self.machine.on_open(&name, &attributes);
                }
                XmlEvent::End(element) => {
                    let name = element_name(element.name());
                    if let Some(feature) = self.machine.on_close(&name) {
                        return Ok(Some(feature));
                    }
                }
                XmlEvent::Text(text) => {
                    let text = text.unescape().map_err(quick_xml::Error::from)?;
                    self.machine.on_text(&text);
                }
                XmlEvent::CData(cdata) if self.options.cdata_as_text => {
                    let raw = cdata.into_inner();
                    let text = std::str::from_utf8(&raw)?;
                    self.machine.on_text(text);
                }
                XmlEvent::Eof => {
                    self.machine.finish();
                    debug!(features = self.machine.emitted(), "end of KML input");
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for KmlReader<R> {
    type Item = Result<Feature>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_feature() {
            Ok(Some(feature)) => Some(Ok(feature)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Lower-cased local name, without any namespace prefix.
fn element_name(name: QName<'_>) -> String {
    String::from_utf8_lossy(name.local_name().as_ref()).to_ascii_lowercase()
}

fn element_attributes(element: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    for attr in element.html_attributes() {
        let attr = attr.map_err(|e| KmlError::Xml(quick_xml::Error::InvalidAttr(e)))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_ascii_lowercase();
        let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
        attributes.push((key, value.into_owned()));
    }
    Ok(attributes)
}

/// Features from an in-memory KML document.
pub fn features_from_str(kml: &str) -> KmlReader<&[u8]> {
    KmlReader::new(kml.as_bytes())
}

/// Features from any byte source, buffered according to `options`.
pub fn features_from_reader<R: Read>(
    source: R,
    options: ConverterOptions,
) -> KmlReader<BufReader<R>> {
    let source = BufReader::with_capacity(options.buffer_capacity, source);
    KmlReader::with_options(source, options)
}

/// Converts a whole document, stopping at the first tokenizer error.
pub fn convert_str(kml: &str) -> Result<Vec<Feature>> {
    features_from_str(kml).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmlstream_core::Geometry;

    #[test]
    fn test_mixed_case_and_namespaces() {
        let kml = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml:kml xmlns:kml="http://www.opengis.net/kml/2.2">
  <kml:Placemark>
    <kml:NAME>Prefixed</kml:NAME>
    <kml:Point><kml:coordinates>1,2</kml:coordinates></kml:Point>
  </kml:Placemark>
</kml:kml>"#;
        let features = convert_str(kml).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(
            features[0].properties.get("name").and_then(|v| v.as_str()),
            Some("Prefixed")
        );
        assert_eq!(
            features[0].geometry,
            Some(Geometry::Point {
                coordinates: vec![1.0, 2.0]
            })
        );
    }

    #[test]
    fn test_entities_unescaped() {
        let kml = "<kml><Placemark><name>Fish &amp; Chips</name></Placemark></kml>";
        let features = convert_str(kml).unwrap();
        assert_eq!(
            features[0].properties.get("name").and_then(|v| v.as_str()),
            Some("Fish & Chips")
        );
    }

    #[test]
    fn test_cdata_option() {
        let kml = "<kml><Placemark><description><![CDATA[<b>bold</b>]]></description></Placemark></kml>";

        let features = convert_str(kml).unwrap();
        assert_eq!(
            features[0].properties.get("description").and_then(|v| v.as_str()),
            Some("<b>bold</b>")
        );

        let options = ConverterOptions {
            cdata_as_text: false,
            ..Default::default()
        };
        let features: Vec<_> = features_from_reader(kml.as_bytes(), options)
            .collect::<Result<_>>()
            .unwrap();
        assert!(features[0].properties.is_empty());
    }

    #[test]
    fn test_self_closing_elements() {
        let kml = r#"<kml><Placemark><Point/><ExtendedData><Data name="a"/></ExtendedData></Placemark></kml>"#;
        let features = convert_str(kml).unwrap();
        assert_eq!(
            features[0].geometry,
            Some(Geometry::Point {
                coordinates: Vec::new()
            })
        );
    }

    #[test]
    fn test_lazy_iteration() {
        let kml = "<kml><Placemark><name>a</name></Placemark><Placemark><name>b</name></Placemark></kml>";
        let mut reader = features_from_str(kml);
        assert!(reader.next().is_some());
        assert_eq!(reader.emitted(), 1);
        assert!(reader.next().is_some());
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_tokenizer_error_is_fatal() {
        let kml = "<kml><Placemark><name>a</name></Placemark><Placemark><name>b</oops></Placemark></kml>";
        let mut reader = features_from_str(kml);
        assert!(matches!(reader.next(), Some(Ok(_))));
        assert!(matches!(reader.next(), Some(Err(KmlError::Xml(_)))));
        assert!(reader.next().is_none());
    }
}
