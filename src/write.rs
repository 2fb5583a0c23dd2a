use cookie_factory::combinator::string;
use cookie_factory::multi::{all, separated_list};
use cookie_factory::sequence::tuple;
use cookie_factory::*;

use crate::document::{Angle, AnimDocument, KeyframeBlock, RenderOptions};
use crate::error::{Error, Result};

use std::io;

impl Angle {
    fn write<W: io::Write>(&self) -> impl SerializeFn<W> {
        string(format!("Angle({:.6},{:.6},{:.6})", self.x, self.y, self.z))
    }
}

impl KeyframeBlock {
    fn write<'a, W: io::Write + 'a>(
        &'a self,
        bones: Option<&'a [String]>,
    ) -> impl SerializeFn<W> + 'a {
        let angles = self.angles.iter().enumerate().map(move |(i, angle)| {
            let note = match bones.and_then(|b| b.get(i)) {
                Some(bone) => format!("      -- {}", bone),
                None => String::new(),
            };
            tuple((angle.write(), string(","), string(note), string("\n")))
        });
        tuple((
            string("{\n"),
            all(angles),
            string(format!("{},\n", self.hold)),
            string(format!("{}\n", self.sword_out)),
            string("}"),
        ))
    }
}

impl AnimDocument {
    fn write<'a, W: io::Write + 'a>(
        &'a self,
        options: &'a RenderOptions,
    ) -> impl SerializeFn<W> + 'a {
        let bones = options.annotate_bones.as_deref();
        let blocks = self.blocks.iter().map(move |block| block.write(bones));
        tuple((
            string(format!("--@name {}\n", self.module_path)),
            string(format!("{}={{\n", self.table_name)),
            separated_list(string(",\n"), blocks),
            string("\n}\n"),
        ))
    }

    /// The full text, built in memory.
    pub fn render(&self, options: &RenderOptions) -> Result<String> {
        let buf = gen_simple(self.write(options), Vec::new())
            .map_err(|e| Error::Render(format!("{:?}", e)))?;
        String::from_utf8(buf).map_err(|e| Error::Render(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::BONE_ORDER;

    fn block(hold: i32, first: Angle) -> KeyframeBlock {
        let mut angles = vec![Angle::ZERO; 9];
        angles[0] = first;
        KeyframeBlock {
            angles,
            hold,
            sword_out: true,
        }
    }

    const ZERO_LINE: &str = "Angle(0.000000,0.000000,0.000000),\n";

    #[test]
    fn renders_the_table_layout() {
        let doc = AnimDocument::new(
            "Slash Combo 1",
            vec![
                block(10, Angle::new(12.5, -3.25, 0.)),
                block(1, Angle::new(-90., 0., 180.)),
            ],
        );
        let zeros = ZERO_LINE.repeat(8);
        let expected = format!(
            "--@name slashblade_project/anim/slash_combo_1\n\
             SLASH_COMBO_1={{\n\
             {{\n\
             Angle(12.500000,-3.250000,0.000000),\n\
             {zeros}\
             10,\n\
             true\n\
             }},\n\
             {{\n\
             Angle(-90.000000,0.000000,180.000000),\n\
             {zeros}\
             1,\n\
             true\n\
             }}\n\
             }}\n",
            zeros = zeros
        );
        assert_eq!(doc.to_string(), expected);
    }

    #[test]
    fn angles_print_six_exact_decimals() {
        let sword = Angle::new(123.456789, -77.654319, 0.);
        let doc = AnimDocument::new("Idle", vec![block(1, sword)]);
        let text = doc.to_string();
        assert!(text.contains("\nAngle(123.456789,-77.654319,0.000000),\n"), "{}", text);
    }

    #[test]
    fn last_block_has_no_separator() {
        let doc = AnimDocument::new("Idle", vec![block(1, Angle::ZERO)]);
        let text = doc.to_string();
        assert!(text.ends_with("true\n}\n}\n"));
        assert!(!text.contains("},"));
    }

    #[test]
    fn annotations_name_each_slot() {
        let doc = AnimDocument::new("Idle", vec![block(1, Angle::ZERO)]);
        let text = doc.render(&RenderOptions::annotated(&BONE_ORDER)).unwrap();
        let lines: Vec<&str> = text.lines().filter(|l| l.starts_with("Angle")).collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "Angle(0.000000,0.000000,0.000000),      -- Torso");
        assert_eq!(lines[8], "Angle(0.000000,0.000000,0.000000),      -- Sword");
    }
}
