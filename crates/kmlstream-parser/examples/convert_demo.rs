use kmlstream_parser::{features_from_str, validate_feature, FeatureCollectionWriter};

fn main() {
    // Example KML document
    let kml = r##"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Schema id="trails">
      <SimpleField type="double" name="length"><displayName>Length (km)</displayName></SimpleField>
    </Schema>
    <Folder>
      <name>Grand Canyon</name>
      <Placemark>
        <name>Bright Angel Trailhead</name>
        <Point><coordinates>-112.1435,36.0576,0</coordinates></Point>
      </Placemark>
      <Placemark>
        <name>Bright Angel Trail</name>
        <ExtendedData>
          <SchemaData schemaUrl="#trails"><SimpleData name="length">15.3</SimpleData></SchemaData>
        </ExtendedData>
        <LineString>
          <coordinates>
            -112.1435,36.0576,2091 -112.1470,36.0640,1790 -112.1540,36.0790,1160
          </coordinates>
        </LineString>
      </Placemark>
    </Folder>
  </Document>
</kml>"##;

    println!("Converting KML document...\n");

    let mut writer = FeatureCollectionWriter::new(Vec::new()).pretty(true);
    for result in features_from_str(kml) {
        match result {
            Ok(feature) => {
                let kind = feature
                    .geometry
                    .as_ref()
                    .map(|g| g.geometry_type().to_string())
                    .unwrap_or_else(|| "null".to_string());
                println!("Feature with {} properties, geometry {}", feature.properties.len(), kind);
                if let Err(e) = validate_feature(&feature) {
                    println!("  Invalid GeoJSON: {}", e);
                }
                if let Err(e) = writer.write_feature(&feature) {
                    eprintln!("Failed to write feature: {}", e);
                    return;
                }
            }
            Err(e) => {
                eprintln!("Failed to parse KML: {}", e);
                return;
            }
        }
    }

    match writer.finish() {
        Ok(out) => println!("\n{}", String::from_utf8_lossy(&out)),
        Err(e) => eprintln!("Failed to finish output: {}", e),
    }
}
