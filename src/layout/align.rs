//! Placement of a block inside its block row / block column allocation.

use crate::types::{HAlign, VAlign};

/// Offset of a block from the top-left corner of its allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub left: usize,
    pub top: usize,
}

/// Compute the padding of a `(rows, cols)` block in a `row_height` x
/// `col_width` allocation.
///
/// A block that already fills its allocation is never padded. Centering
/// rounds down, so any odd slack cell ends up after the block.
pub fn pad(
    block_shape: (usize, usize),
    row_height: usize,
    col_width: usize,
    halign: HAlign,
    valign: VAlign,
) -> Padding {
    let (rows, cols) = block_shape;
    let slack_x = col_width.saturating_sub(cols);
    let slack_y = row_height.saturating_sub(rows);

    let left = match halign {
        HAlign::Left => 0,
        HAlign::Center => slack_x / 2,
        HAlign::Right | HAlign::Auto => slack_x,
    };
    let top = match valign {
        VAlign::Top => 0,
        VAlign::Center => slack_y / 2,
        VAlign::Bottom | VAlign::Auto => slack_y,
    };

    Padding { left, top }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(HAlign::Left, VAlign::Top => Padding { left: 0, top: 0 }; "left top")]
    #[test_case(HAlign::Right, VAlign::Bottom => Padding { left: 3, top: 2 }; "right bottom")]
    #[test_case(HAlign::Auto, VAlign::Auto => Padding { left: 3, top: 2 }; "auto is right bottom")]
    #[test_case(HAlign::Center, VAlign::Center => Padding { left: 1, top: 1 }; "center rounds down")]
    fn test_pad_modes(halign: HAlign, valign: VAlign) -> Padding {
        pad((1, 2), 3, 5, halign, valign)
    }

    #[test]
    fn test_full_block_is_never_padded() {
        for halign in [HAlign::Left, HAlign::Center, HAlign::Right, HAlign::Auto] {
            for valign in [VAlign::Top, VAlign::Center, VAlign::Bottom, VAlign::Auto] {
                assert_eq!(pad((2, 4), 2, 4, halign, valign), Padding::default());
            }
        }
    }
}
