use std::path::Path;

use vtkio::model::*;

use super::ExportError;
use crate::amr::Block;

/// Builds the VTK image data model of a single block, with its cell values stored
/// in a cell attribute named `field`.
pub fn block_model<const N: usize>(block: &Block<'_, N>, spacing: [f64; N], field: &str) -> Vtk {
    assert!(N > 0 && N <= 3, "Vtk Output only supported for 0 < N ≤ 3");

    let mut origin = [0.0f32; 3];
    let mut delta = [0.0f32; 3];
    let mut points = [0i32; 3];

    // vtkio stores image geometry in single precision, so origins and spacings are
    // rounded here. The overlapping index writes the same rounded values.
    for axis in 0..N {
        origin[axis] = block.origin[axis] as f32;
        delta[axis] = spacing[axis] as f32;
        points[axis] = block.cells.size[axis] as i32;
    }

    let extent = Extent::Ranges([0..=points[0], 0..=points[1], 0..=points[2]]);

    let attributes = Attributes {
        point: Vec::new(),
        cell: vec![Attribute::DataArray(DataArrayBase {
            name: field.to_string(),
            elem: ElementType::Scalars {
                num_comp: 1,
                lookup_table: None,
            },
            data: IOBuffer::new(block.data.to_vec()),
        })],
    };

    let piece = ImageDataPiece {
        extent: extent.clone(),
        data: attributes,
    };

    Vtk {
        version: (1, 0).into(),
        title: format!("Patch {}", block.id),
        byte_order: ByteOrder::LittleEndian,
        data: DataSet::ImageData {
            extent,
            origin,
            spacing: delta,
            meta: None,
            pieces: vec![Piece::Inline(Box::new(piece))],
        },
        file_path: None,
    }
}

/// Writes a single block as a `.vti` file.
pub fn export_block<const N: usize>(
    block: &Block<'_, N>,
    spacing: [f64; N],
    field: &str,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let model = block_model(block, spacing, field);
    model.export(path).map_err(|err| match err {
        vtkio::Error::IO(io) => ExportError::Io(io),
        other => ExportError::Vtk(format!("{:?}", other)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amr::Hierarchy;

    #[test]
    fn image_data_layout() {
        let mut hierarchy = Hierarchy::new([1.0, 1.0], [0.0, 0.0]);
        hierarchy.refine([4, 2]);

        let snapshot = hierarchy.snapshot();
        let level = &snapshot.levels[1];
        let model = block_model(&level.blocks[0], level.spacing, "data");

        let DataSet::ImageData {
            extent,
            origin,
            spacing,
            pieces,
            ..
        } = model.data
        else {
            panic!("expected image data");
        };

        assert_eq!(extent, Extent::Ranges([0..=16, 0..=16, 0..=0]));
        assert_eq!(origin, [4.0, 2.0, 0.0]);
        assert_eq!(spacing, [0.5, 0.5, 0.0]);
        assert_eq!(pieces.len(), 1);

        let Piece::Inline(piece) = &pieces[0] else {
            panic!("expected inline piece");
        };
        assert!(piece.data.point.is_empty());
        assert_eq!(piece.data.cell.len(), 1);

        let Attribute::DataArray(array) = &piece.data.cell[0] else {
            panic!("expected data array");
        };
        assert_eq!(array.name, "data");
        assert_eq!(array.data.len(), 256);
    }
}
