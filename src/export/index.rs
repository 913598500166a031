//! Writer for the `.vthb` index of a VTK AMR dataset, which lists every block of every
//! level along with the `.vti` file holding it.

use std::fmt::{self, Write as _};

use super::AmrKind;
use crate::amr::Snapshot;

/// Pads an `N` dimensional array out to three dimensions.
fn pad3<T: Copy + Default, const N: usize>(values: [T; N]) -> [T; 3] {
    let mut result = [T::default(); 3];
    result[..N].copy_from_slice(&values);
    result
}

/// Escapes the characters that may not appear verbatim inside a quoted attribute.
fn escape_attribute(value: &str) -> String {
    let mut result = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            c => result.push(c),
        }
    }

    result
}

fn grid_description(n: usize) -> &'static str {
    match n {
        1 => "X",
        2 => "XY",
        _ => "XYZ",
    }
}

/// Renders the index document. `file` maps a `(level, block index)` pair to the path of
/// the block's file, relative to the index.
///
/// Origins and spacings are written in single precision, the same values the image
/// data files carry.
pub fn index_xml<const N: usize>(
    snapshot: &Snapshot<'_, N>,
    kind: AmrKind,
    file: impl Fn(usize, usize) -> String,
) -> Result<String, fmt::Error> {
    let tag = kind.vtk_type();

    let mut xml = String::new();
    writeln!(xml, "<?xml version=\"1.0\"?>")?;
    writeln!(
        xml,
        "<VTKFile type=\"{tag}\" version=\"1.1\" byte_order=\"LittleEndian\" header_type=\"UInt32\">"
    )?;

    match kind {
        AmrKind::NonOverlapping => writeln!(xml, "  <{tag}>")?,
        AmrKind::Overlapping => {
            let origin = pad3(snapshot.origin.map(|x| x as f32));
            writeln!(
                xml,
                "  <{tag} origin=\"{} {} {}\" grid_description=\"{}\">",
                origin[0],
                origin[1],
                origin[2],
                grid_description(N)
            )?;
        }
    }

    for (l, level) in snapshot.levels.iter().enumerate() {
        match kind {
            AmrKind::NonOverlapping => writeln!(xml, "    <Block level=\"{l}\">")?,
            AmrKind::Overlapping => {
                let spacing = pad3(level.spacing.map(|h| h as f32));
                writeln!(
                    xml,
                    "    <Block level=\"{l}\" spacing=\"{} {} {}\">",
                    spacing[0], spacing[1], spacing[2]
                )?;
            }
        }

        for block in level.blocks.iter() {
            let path = escape_attribute(&file(l, block.index));

            match kind {
                AmrKind::NonOverlapping => writeln!(
                    xml,
                    "      <DataSet index=\"{}\" file=\"{}\"/>",
                    block.index, path
                )?,
                AmrKind::Overlapping => {
                    let lower = pad3(block.cells.lower);
                    let upper = pad3(block.cells.upper());

                    writeln!(
                        xml,
                        "      <DataSet index=\"{}\" amr_box=\"{} {} {} {} {} {}\" file=\"{}\"/>",
                        block.index,
                        lower[0],
                        upper[0],
                        lower[1],
                        upper[1],
                        lower[2],
                        upper[2],
                        path
                    )?;
                }
            }
        }

        writeln!(xml, "    </Block>")?;
    }

    writeln!(xml, "  </{tag}>")?;
    writeln!(xml, "</VTKFile>")?;

    Ok(xml)
}
