//! KML track files
use log::{info, warn};

use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use super::{Track, TrackDocument, TrackSink, Vertex};
use crate::error::Error;

const SURFACE_COLOR: &str = "ffe60000";
const AIRBORNE_COLOR: &str = "ff0000e6";

fn write_polyline<W: Write>(
    w: &mut W,
    folder: &str,
    document: &TrackDocument,
    vertices: &[Vertex],
    airborne: bool,
) -> Result<(), Error> {
    let (color, altitude_mode) = if airborne {
        (AIRBORNE_COLOR, "absolute")
    } else {
        (SURFACE_COLOR, "clampToGround")
    };

    writeln!(w, "<Folder>")?;
    writeln!(w, "<name>{}</name>", folder)?;
    writeln!(w, "<Placemark>")?;
    writeln!(w, "<name>{}</name>", document.address)?;
    writeln!(w, "<Snippet maxLines=\"0\"></Snippet>")?;
    writeln!(w, "<description>&amp;nbsp;</description>")?;
    writeln!(w, "<Style>")?;
    writeln!(w, "<LineStyle>")?;
    writeln!(w, "<color>{}</color>", color)?;
    writeln!(w, "<width>4</width>")?;
    writeln!(w, "</LineStyle>")?;
    if airborne {
        writeln!(w, "<PolyStyle>")?;
        writeln!(w, "<color>cc0000e6</color>")?;
        writeln!(w, "</PolyStyle>")?;
    }
    writeln!(w, "</Style>")?;
    writeln!(w, "<MultiGeometry>")?;
    writeln!(w, "<LineString>")?;
    writeln!(w, "<extrude>1</extrude>")?;
    writeln!(w, "<altitudeMode>{}</altitudeMode>", altitude_mode)?;
    writeln!(w, "<coordinates>")?;
    for vertex in vertices {
        writeln!(
            w,
            "{},{},{} ",
            vertex.longitude, vertex.latitude, vertex.altitude_m
        )?;
    }
    writeln!(w, "</coordinates>")?;
    writeln!(w, "</LineString>")?;
    writeln!(w, "</MultiGeometry>")?;
    writeln!(w, "</Placemark>")?;
    writeln!(w, "</Folder>")?;
    Ok(())
}

/// Writes `document` as a KML document.
pub fn write_kml<W: Write>(document: &TrackDocument, mut w: W) -> Result<(), Error> {
    writeln!(w, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(w, "<kml xmlns=\"http://www.opengis.net/kml/2.2\">")?;
    writeln!(w, "<Document>")?;
    writeln!(w, "<name>{}</name>", document.name)?;

    write_polyline(&mut w, "Track - Surface", document, &document.ground, false)?;
    write_polyline(&mut w, "Track - Airborne", document, &document.airborne, true)?;

    writeln!(w, "<Folder>")?;
    writeln!(w, "<name>Data</name>")?;
    for point in document.points.iter() {
        writeln!(w, "<Placemark>")?;
        writeln!(w, "<name>{}</name>", point.name)?;
        writeln!(w, "<description>")?;
        writeln!(w, "<![CDATA[")?;
        writeln!(w, "<table border=\"1\">")?;
        writeln!(w, "<tr><td>Key</td><td>Value</td><td>Age (s)</td></tr>")?;
        for property in point.properties.iter() {
            writeln!(
                w,
                "<tr><td>{}</td><td>{}</td><td>{:.0}</td></tr>",
                property.key, property.value, property.age_s
            )?;
        }
        writeln!(w, "</table>")?;
        writeln!(w, "]]>")?;
        writeln!(w, "</description>")?;
        writeln!(w, "<Point>")?;
        if point.airborne {
            writeln!(w, "<altitudeMode>absolute</altitudeMode>")?;
        } else {
            writeln!(w, "<altitudeMode>clampToGround</altitudeMode>")?;
        }
        writeln!(
            w,
            "<coordinates>{},{},{}</coordinates>",
            point.vertex.longitude, point.vertex.latitude, point.vertex.altitude_m
        )?;
        writeln!(w, "</Point>")?;
        writeln!(w, "</Placemark>")?;
    }
    writeln!(w, "</Folder>")?;

    writeln!(w, "</Document>")?;
    writeln!(w, "</kml>")?;
    w.flush()?;
    Ok(())
}

/// [KmlDirectory] writes one KML file per track,
/// as `root/YYYY/MM/DD/YYYY-MM-DD.HH-MM-SS.ADDRESS.kml`.
#[derive(Debug, Clone)]
pub struct KmlDirectory {
    root: PathBuf,
}

impl KmlDirectory {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path of `track`, None for an empty track.
    pub fn path(&self, track: &Track) -> Option<PathBuf> {
        let (y, m, d, _, _, _, _) = track.start()?.to_gregorian_utc();
        Some(
            self.root
                .join(format!("{:04}", y))
                .join(format!("{:02}", m))
                .join(format!("{:02}", d))
                .join(format!("{}.kml", track.file_stem())),
        )
    }
}

impl TrackSink for KmlDirectory {
    fn export(&mut self, track: &Track) -> Result<(), Error> {
        let Some(path) = self.path(track) else {
            warn!("{}: empty track not exported", track.address);
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let document = TrackDocument::from(track);
        write_kml(&document, BufWriter::new(File::create(&path)?))?;

        info!("{}: {} points exported to {}", track.address, track.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::report::Address;

    #[test]
    fn empty_document() {
        let track = Track::new(Address(0x40621D), vec![]);
        let document = TrackDocument::from(&track);

        let mut content = Vec::<u8>::new();
        write_kml(&document, &mut content).unwrap();

        let content = String::from_utf8(content).unwrap();
        assert!(content.starts_with("<?xml"));
        assert!(content.contains("<name>Track - Surface</name>"));
        assert!(content.contains("<name>Track - Airborne</name>"));
        assert!(content.contains("<color>ff0000e6</color>"));
        assert!(content.trim_end().ends_with("</kml>"));
        assert!(KmlDirectory::new("/tmp").path(&track).is_none());
    }

    #[test]
    fn directory_layout() {
        use crate::{
            position::Position,
            state::{PositionFix, TrackState},
        };
        use hifitime::Epoch;

        let t = Epoch::from_gregorian_utc(2019, 6, 1, 13, 5, 9, 0);
        let mut state = TrackState::default();
        state.position.set(
            PositionFix {
                position: Position::new(52.0, 4.0),
                airborne: true,
                receiver_distance_nm: 0.0,
                receiver_bearing_deg: 0.0,
            },
            t,
        );
        state.altitude.set(38000, t);
        let track = Track::new(Address(0x40621D), vec![state]);

        let root = std::env::temp_dir().join("adsb-track-kml");
        let mut sink = KmlDirectory::new(&root);

        let path = sink.path(&track).unwrap();
        assert_eq!(
            path,
            root.join("2019/06/01/2019-06-01.13-05-09.40621D.kml")
        );

        sink.export(&track).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<coordinates>4,52,11582.4"));
        assert!(content.contains("<td>Altitude</td><td>38000</td><td>0</td>"));
    }
}
