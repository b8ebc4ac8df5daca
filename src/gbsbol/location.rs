use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::constants::{BIO_STRAND_FORWARD, BIO_STRAND_REVERSE, SO_FORWARD, SO_REVERSE};
use crate::sbol::objects::{Location, LocationKind};
use crate::types::{FeatureSortKey, Identity};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    // anything but the reverse sentinel reads as forward
    pub fn from_bio_strand(strand: i8) -> Strand {
        if strand == BIO_STRAND_REVERSE {
            Strand::Reverse
        } else {
            Strand::Forward
        }
    }

    pub fn to_bio_strand(&self) -> i8 {
        match *self {
            Strand::Forward => BIO_STRAND_FORWARD,
            Strand::Reverse => BIO_STRAND_REVERSE,
        }
    }

    pub fn orientation_uri(&self) -> &'static str {
        match *self {
            Strand::Forward => SO_FORWARD,
            Strand::Reverse => SO_REVERSE,
        }
    }

    // a missing orientation is read as forward, any URI other than the two
    // canonical ones is rejected
    pub fn from_orientation(orientation: Option<&str>)
        -> Result<Strand, InvalidOrientation>
    {
        match orientation {
            None => Ok(Strand::Forward),
            Some(SO_FORWARD) => Ok(Strand::Forward),
            Some(SO_REVERSE) => Ok(Strand::Reverse),
            Some(other) => Err(InvalidOrientation(other.to_owned())),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Strand::Forward => f.write_str("+"),
            Strand::Reverse => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOrientation(pub String);

/// One part of a flat-file location, 0-based and end exclusive.  A part whose
/// start equals its end is a point (eg. "5^6").
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlatInterval {
    pub start: i64,
    pub end: i64,
    pub strand: Strand,
}

impl FlatInterval {
    pub fn new(start: i64, end: i64, strand: Strand) -> FlatInterval {
        FlatInterval {
            start,
            end,
            strand,
        }
    }

    pub fn point(at: i64, strand: Strand) -> FlatInterval {
        FlatInterval::new(at, at, strand)
    }

    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    fn cmp_coords(&self, other: &FlatInterval) -> Ordering {
        (self.start, self.end).cmp(&(other.start, other.end))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum FlatLocation {
    Simple(FlatInterval),
    Join(Vec<FlatInterval>),
}

impl FlatLocation {
    // one part needs no compound wrapper
    pub fn from_parts(mut parts: Vec<FlatInterval>) -> FlatLocation {
        if parts.len() == 1 {
            FlatLocation::Simple(parts.remove(0))
        } else {
            FlatLocation::Join(parts)
        }
    }

    pub fn parts(&self) -> &[FlatInterval] {
        match self {
            FlatLocation::Simple(interval) => std::slice::from_ref(interval),
            FlatLocation::Join(parts) => parts,
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, FlatLocation::Join(_))
    }

    // Reverse only if every part is on the reverse strand
    pub fn strand(&self) -> Strand {
        let parts = self.parts();
        if !parts.is_empty() && parts.iter().all(|part| part.strand == Strand::Reverse) {
            Strand::Reverse
        } else {
            Strand::Forward
        }
    }

    pub fn sort_key(&self) -> FeatureSortKey {
        self.parts().iter()
            .flat_map(|part| [part.start, part.end])
            .collect()
    }
}

/// Convert one flat interval to an SBOL location on `sequence`.  The location
/// identity is assigned later by its owner.
pub fn to_graph(interval: &FlatInterval, sequence: &Identity) -> Location {
    let kind =
        if interval.is_point() {
            LocationKind::Cut {
                at: interval.start,
            }
        } else {
            LocationKind::Range {
                start: interval.start,
                end: interval.end,
            }
        };

    Location {
        identity: Identity::new(),
        sequence: sequence.clone(),
        orientation: Some(interval.strand.orientation_uri().to_owned()),
        kind,
    }
}

/// Convert the locations of a feature back to flat intervals.  With more than
/// one location the parts are sorted by (start, end), descending when the
/// feature is on the reverse strand since joined reverse strand segments are
/// listed in transcription order.  Also returns the flattened coordinates in
/// emission order for ordering the features of a record.
pub fn to_flat(locations: &[Location], feature_strand: Strand)
    -> Result<(FlatLocation, FeatureSortKey), InvalidOrientation>
{
    let mut parts = locations.iter()
        .map(|location| {
            let strand = Strand::from_orientation(location.orientation.as_deref())?;
            Ok(FlatInterval::new(location.start(), location.end(), strand))
        })
        .collect::<Result<Vec<_>, InvalidOrientation>>()?;

    if parts.len() > 1 {
        match feature_strand {
            Strand::Forward => parts.sort_by(|a, b| a.cmp_coords(b)),
            Strand::Reverse => parts.sort_by(|a, b| b.cmp_coords(a)),
        }
    }

    let flat_location = FlatLocation::from_parts(parts);
    let sort_key = flat_location.sort_key();

    Ok((flat_location, sort_key))
}
