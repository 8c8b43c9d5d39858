/// OBJ subset parser: `v`, `vn` and triangular `f` records
///
/// Every other record kind is skipped to the end of its line. After the whole
/// source has been read, colors are derived from the normals and the mesh is
/// centered at the origin and scaled so that its largest half-extent is
/// [`NORMALIZED_HALF_EXTENT`].
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::{tag, take_till1},
    character::complete::{space0, space1},
    combinator::opt,
    number::complete::float,
    sequence::preceded,
    IResult,
};

use crate::error::ParseError;
use crate::geometry::{Aabb, MeshData};

/// Half-extent of the largest axis after normalization
pub const NORMALIZED_HALF_EXTENT: f32 = 2.0;

/// One classified line of the source
#[derive(Debug, Clone, PartialEq)]
enum Record {
    Position(Point3<f32>),
    Normal(Vector3<f32>),
    Face([u32; 3]),
    Skip,
}

/// Parse and normalize a mesh source
pub fn parse_obj(input: &str) -> Result<MeshData, ParseError> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();
    let mut bounds = Aabb::empty();

    for (number, line) in input.lines().enumerate() {
        match parse_line(line, number + 1)? {
            Record::Position(position) => {
                bounds.include(&position);
                positions.push(position);
            }
            Record::Normal(normal) => normals.push(normal),
            Record::Face(face) => indices.extend(face.iter().map(|index| index - 1)),
            Record::Skip => {}
        }
    }

    if positions.len() != normals.len() {
        return Err(ParseError::AttributeMismatch {
            positions: positions.len(),
            normals: normals.len(),
        });
    }

    if let Some(&index) = indices.iter().find(|&&index| index as usize >= positions.len()) {
        return Err(ParseError::IndexOutOfRange {
            index: index + 1,
            vertex_count: positions.len(),
        });
    }

    let colors = derive_colors(&normals)?;
    center_and_scale(&mut positions, &bounds)?;

    log::debug!(
        "parsed mesh with {} vertices and {} triangles",
        positions.len(),
        indices.len() / 3
    );

    Ok(MeshData::from_parts(positions, normals, colors, indices))
}

/// Map each unit normal onto the RGB cube
fn derive_colors(normals: &[Vector3<f32>]) -> Result<Vec<Vector3<f32>>, ParseError> {
    normals
        .iter()
        .enumerate()
        .map(|(index, normal)| {
            normal
                .try_normalize(f32::EPSILON)
                .filter(|unit| unit.iter().all(|c| c.is_finite()))
                .map(|unit| unit * 0.5 + Vector3::repeat(0.5))
                .ok_or(ParseError::DegenerateNormal { index })
        })
        .collect()
}

fn center_and_scale(positions: &mut [Point3<f32>], bounds: &Aabb) -> Result<(), ParseError> {
    let center = bounds.center();
    let scaler = bounds.half_extents().max();

    if !scaler.is_finite() || scaler <= f32::EPSILON {
        return Err(ParseError::DegenerateExtent { scaler });
    }

    for position in positions.iter_mut() {
        *position = Point3::from((*position - center) / scaler * NORMALIZED_HALF_EXTENT);
        if !position.iter().all(|c| c.is_finite()) {
            return Err(ParseError::DegenerateExtent { scaler });
        }
    }

    Ok(())
}

fn parse_line(line: &str, number: usize) -> Result<Record, ParseError> {
    let (rest, keyword) = match keyword(line) {
        Ok(result) => result,
        // Blank line
        Err(_) => return Ok(Record::Skip),
    };

    match keyword {
        "v" => {
            let (x, y, z) = finite(fields(rest, vector3, "v", number)?, "v", number)?;
            Ok(Record::Position(Point3::new(x, y, z)))
        }
        "vn" => {
            let (x, y, z) = finite(fields(rest, vector3, "vn", number)?, "vn", number)?;
            Ok(Record::Normal(Vector3::new(x, y, z)))
        }
        "f" => {
            let indices = fields(rest, face, "f", number)?;
            if indices.contains(&0) {
                return Err(ParseError::InvalidIndex { line: number });
            }
            Ok(Record::Face(indices))
        }
        _ => Ok(Record::Skip),
    }
}

/// `float` accepts `nan` and `inf`, and overflowing literals round to infinity
fn finite(
    (x, y, z): (f32, f32, f32),
    record: &'static str,
    line: usize,
) -> Result<(f32, f32, f32), ParseError> {
    if x.is_finite() && y.is_finite() && z.is_finite() {
        Ok((x, y, z))
    } else {
        Err(ParseError::NonFinite { line, record })
    }
}

/// Run a field parser and turn nom failures into a [`ParseError`]
fn fields<'a, T>(
    input: &'a str,
    parser: impl Fn(&'a str) -> IResult<&'a str, T>,
    record: &'static str,
    line: usize,
) -> Result<T, ParseError> {
    match parser(input) {
        Ok((rest, value)) => {
            if !rest.trim().is_empty() {
                log::debug!("line {line}: ignoring trailing `{}`", rest.trim());
            }
            Ok(value)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let remaining = e.input.trim_start();
            match remaining.split_whitespace().next() {
                None => Err(ParseError::Truncated { line, record }),
                Some(token) => Err(ParseError::InvalidNumber {
                    line,
                    token: token.to_string(),
                }),
            }
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::Truncated { line, record }),
    }
}

fn keyword(input: &str) -> IResult<&str, &str> {
    preceded(space0, take_till1(|c: char| c.is_whitespace()))(input)
}

fn vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, x) = preceded(space1, float)(input)?;
    let (input, y) = preceded(space1, float)(input)?;
    let (input, z) = preceded(space1, float)(input)?;
    Ok((input, (x, y, z)))
}

fn face(input: &str) -> IResult<&str, [u32; 3]> {
    let (input, a) = preceded(space1, face_index)(input)?;
    let (input, b) = preceded(space1, face_index)(input)?;
    let (input, c) = preceded(space1, face_index)(input)?;
    Ok((input, [a, b, c]))
}

/// Position index of a face token, ignoring `/vt/vn` references
fn face_index(input: &str) -> IResult<&str, u32> {
    let (input, index) = nom::character::complete::u32(input)?;
    let (input, _) = opt(preceded(tag("/"), take_till1(|c: char| c.is_whitespace())))(input)?;
    Ok((input, index))
}
