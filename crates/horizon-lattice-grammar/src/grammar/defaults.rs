//! Default property, helper and media-feature grammars.
//!
//! Names use underscores; hyphenated names are normalized on lookup.

/// Properties settable from a stylesheet.
pub const PROPERTIES: &[(&str, &str)] = &[
    // writing modes
    ("direction", "ltr | rtl"),
    (
        "unicode_bidi",
        "normal | embed | isolate | bidi-override | isolate-override | plaintext",
    ),
    ("writing_mode", "horizontal-tb | vertical-rl | vertical-lr"),
    ("text_orientation", "mixed | upright | sideways"),
    ("glyph_orientation_vertical", r#"auto | <angle> | "0" | "90""#),
    ("text_combine_upright", "none | all"),
    // positioning
    ("position", "static | relative | absolute | sticky | fixed"),
    ("top", "<length> | <percentage> | auto"),
    ("left", "<length> | <percentage> | auto"),
    ("bottom", "<length> | <percentage> | auto"),
    ("right", "<length> | <percentage> | auto"),
    ("offset_before", "<length> | <percentage> | auto"),
    ("offset_after", "<length> | <percentage> | auto"),
    ("offset_start", "<length> | <percentage> | auto"),
    ("offset_end", "<length> | <percentage> | auto"),
    ("z_index", "auto | <integer>"),
    // display
    (
        "display",
        "<display_listitem> | [ <display_outside> || <display_inside> ] | <display_internal> \
         | <display_box> | <display_legacy>",
    ),
    // box model
    ("margin", "[<length> | <percentage> | 0 | auto]{1,4}"),
    ("margin_top", "<length> | <percentage> | 0 | auto"),
    ("margin_right", "<length> | <percentage> | 0 | auto"),
    ("margin_bottom", "<length> | <percentage> | 0 | auto"),
    ("margin_left", "<length> | <percentage> | 0 | auto"),
    ("margin_trim", "none | in-flow | all"),
    ("padding", "[<length> | <percentage> | 0 | auto]{1,4}"),
    ("padding_top", "<length> | <percentage> | 0 | auto"),
    ("padding_right", "<length> | <percentage> | 0 | auto"),
    ("padding_bottom", "<length> | <percentage> | 0 | auto"),
    ("padding_left", "<length> | <percentage> | 0 | auto"),
    ("float", "left | right | none"),
    ("clear", "left | right | both | none"),
    // sizing
    ("box_sizing", "content-box | border-box"),
    (
        "width",
        "<length> | <percentage> | min-content | max-content | fit-content | auto",
    ),
    (
        "height",
        "<length> | <percentage> | min-content | max-content | fit-content | auto",
    ),
    (
        "min_width",
        "<length> | <percentage> | min-content | max-content | fit-content | auto",
    ),
    (
        "max_width",
        "<length> | <percentage> | min-content | max-content | fit-content | auto | none",
    ),
    (
        "min_height",
        "<length> | <percentage> | min-content | max-content | fit-content | auto",
    ),
    (
        "max_height",
        "<length> | <percentage> | min-content | max-content | fit-content | auto | none",
    ),
    // color
    ("color", "<color>"),
    ("opacity", "<alphavalue>"),
    // backgrounds and borders
    ("background_color", "<color>"),
    ("background_image", "<bg_image>#"),
    ("background_repeat", "<repeat_style>#"),
    ("background_attachment", "<attachment>#"),
    (
        "background_position",
        "[<percentage> | <length>]{1,2} | [top | center | bottom] || [left | center | right]",
    ),
    ("background_clip", "<box>#"),
    ("background_origin", "<box>#"),
    ("background_size", "<bg_size>#"),
    ("background", "[<bg_layer> ,]* <final_bg_layer>"),
    ("border_color", "<color>{1,4}"),
    ("border_top_color", "<color>"),
    ("border_right_color", "<color>"),
    ("border_bottom_color", "<color>"),
    ("border_left_color", "<color>"),
    ("border_top_width", "<line_width>"),
    ("border_right_width", "<line_width>"),
    ("border_bottom_width", "<line_width>"),
    ("border_left_width", "<line_width>"),
    ("border_width", "<line_width>{1,4}"),
    ("border_style", "<line_style>{1,4}"),
    ("border_top_style", "<line_style>"),
    ("border_right_style", "<line_style>"),
    ("border_bottom_style", "<line_style>"),
    ("border_left_style", "<line_style>"),
    ("border_top", "<line_width> || <line_style> || <color>"),
    ("border_right", "<line_width> || <line_style> || <color>"),
    ("border_bottom", "<line_width> || <line_style> || <color>"),
    ("border_left", "<line_width> || <line_style> || <color>"),
    (
        "border_radius",
        "<length_percentage>{1,4} [ / <length_percentage>{1,4} ]?",
    ),
    ("border_top_left_radius", "<length_percentage>{1,2}"),
    ("border_top_right_radius", "<length_percentage>{1,2}"),
    ("border_bottom_right_radius", "<length_percentage>{1,2}"),
    ("border_bottom_left_radius", "<length_percentage>{1,2}"),
    ("border", "<line_width> || <line_style> || <color>"),
    (
        "border_image",
        "<border_image_source> || <border_image_slice> \
         [ / <border_image_width> | / <border_image_width>? / <border_image_outset> ]? \
         || <border_image_repeat>",
    ),
    ("border_image_source", "none | <image>"),
    ("border_image_slice", "[<number> | <percentage>]{1,4} && fill?"),
    (
        "border_image_width",
        "[<length_percentage> | <number> | auto]{1,4}",
    ),
    ("border_image_outset", "[<length> | <number>]{1,4}"),
    ("border_image_repeat", "[stretch | repeat | round | space]{1,2}"),
    ("box_shadow", "none | <shadow>#"),
    ("line_height", "normal | <percentage> | <length> | <number>"),
    ("overflow", "visible | hidden | scroll | auto"),
    // fonts
    ("font_display", "auto | block | swap | fallback | optional"),
    (
        "font_family",
        "[ [<generic_family> | <family_name>] , ]* [<generic_family> | <family_name>]",
    ),
    ("font_language_override", "normal | <string>"),
    (
        "font",
        "[ [<font_style> || <font_variant> || <font_weight>]? <font_size> [ / <line_height> ]? \
         <font_family> ] | caption | icon | menu | message-box | small-caption | status-bar",
    ),
    (
        "font_max_size",
        "<absolute_size> | <relative_size> | <length> | <percentage> | infinity",
    ),
    (
        "font_min_size",
        "<absolute_size> | <relative_size> | <length> | <percentage>",
    ),
    ("font_optical_sizing", "auto | none"),
    ("font_palette", "normal | light | dark | <identifier>"),
    (
        "font_size",
        "<absolute_size> | <relative_size> | <length> | <percentage>",
    ),
    (
        "font_stretch",
        "<percentage> | normal | ultra-condensed | extra-condensed | condensed \
         | semi-condensed | semi-expanded | expanded | extra-expanded | ultra-expanded",
    ),
    ("font_style", "normal | italic | oblique <angle>?"),
    ("font_synthesis", "none | [weight || style]"),
    ("font_synthesis_small_caps", "auto | none"),
    ("font_synthesis_style", "auto | none"),
    ("font_synthesis_weight", "auto | none"),
    (
        "font_variant_alternates",
        "normal | [ stylistic(<identifier>) || historical-forms || styleset(<identifier>#) \
         || character-variant(<identifier>#) || swash(<identifier>) || ornaments(<identifier>) \
         || annotation(<identifier>) ]",
    ),
    ("font_variant_emoji", "auto | text | emoji | unicode"),
    ("font_variation_settings", "normal | [<string> <number>]#"),
    ("font_size_adjust", "<number> | none"),
    (
        "font_weight",
        "normal | bold | bolder | lighter | 100 | 200 | 300 | 400 | 500 | 600 | 700 | 800 | 900",
    ),
    ("font_kerning", "auto | normal | none"),
    (
        "font_variant",
        "normal | none | [ <common_lig_values> || <discretionary_lig_values> \
         || <historical_lig_values> || <contextual_alt_values> \
         || [small-caps | all-small-caps | petite-caps | all-petite-caps | unicase | titling-caps] \
         || <numeric_figure_values> || <numeric_spacing_values> || <numeric_fraction_values> \
         || ordinal || slashed-zero || <east_asian_variant_values> || <east_asian_width_values> \
         || ruby || [sub | super] ]",
    ),
    (
        "font_variant_ligatures",
        "normal | none | [ <common_lig_values> || <discretionary_lig_values> \
         || <historical_lig_values> || <contextual_alt_values> ]",
    ),
    ("font_variant_position", "normal | sub | super"),
    (
        "font_variant_caps",
        "normal | small-caps | all-small-caps | petite-caps | all-petite-caps | unicase | titling-caps",
    ),
    (
        "font_variant_numeric",
        "normal | [ <numeric_figure_values> || <numeric_spacing_values> \
         || <numeric_fraction_values> || ordinal || slashed-zero ]",
    ),
    (
        "font_variant_east_asian",
        "normal | [ <east_asian_variant_values> || <east_asian_width_values> || ruby ]",
    ),
    // text
    ("hanging_punctuation", "none | [first || [force-end | allow-end] || last]"),
    ("hyphens", "none | manual | auto"),
    ("letter_spacing", "normal | <length>"),
    ("line_break", "auto | loose | normal | strict | anywhere"),
    ("overflow_wrap", "normal | break-word | anywhere"),
    ("tab_size", "<length> | <number>"),
    (
        "text_align",
        "start | end | left | right | center | justify | match-parent | justify-all",
    ),
    (
        "text_align_all",
        "start | end | left | right | center | justify | match-parent",
    ),
    (
        "text_align_last",
        "auto | start | end | left | right | center | justify | match-parent",
    ),
    ("text_indent", "[<length> | <percentage>] && hanging? && each-line?"),
    ("text_justify", "auto | none | inter-word | inter-character"),
    (
        "text_transform",
        "none | [capitalize | uppercase | lowercase] || full-width || full-size-kana",
    ),
    (
        "white_space",
        "normal | pre | nowrap | pre-wrap | break-spaces | pre-line",
    ),
    ("word_break", "normal | keep-all | break-all | break-word"),
    ("word_spacing", "normal | <length>"),
    ("word_wrap", "normal | break-word | anywhere"),
    // text decoration
    (
        "text_decoration",
        "<text_decoration_line> || <text_decoration_style> || <color>",
    ),
    ("text_decoration_color", "<color>"),
    (
        "text_decoration_line",
        "none | [underline || overline || line-through || blink]",
    ),
    ("text_decoration_style", "solid | double | dotted | dashed | wavy"),
    ("text_emphasis", "<text_emphasis_style> || <text_emphasis_color>"),
    ("text_emphasis_color", "<color>"),
    ("text_emphasis_position", "[over | under] && [right | left]?"),
    (
        "text_emphasis_style",
        "none | [ [filled | open] || [dot | circle | double-circle | triangle | sesame] ] | <string>",
    ),
    ("text_shadow", "none | [<color>? && <length>{2,3}]#"),
    ("text_underline_position", "auto | [under || [left | right]]"),
    // flexbox
    (
        "align_content",
        "flex-start | flex-end | center | space-between | space-around | stretch",
    ),
    ("align_items", "flex-start | flex-end | center | baseline | stretch"),
    (
        "align_self",
        "auto | flex-start | flex-end | center | baseline | stretch",
    ),
    ("flex", "none | [<flex_grow> <flex_shrink>? || <flex_basis>]"),
    (
        "flex_basis",
        "content | <length> | <percentage> | min-content | max-content | fit-content | auto",
    ),
    ("flex_direction", "row | row-reverse | column | column-reverse"),
    ("flex_flow", "<flex_direction> || <flex_wrap>"),
    ("flex_grow", "<number>"),
    ("flex_shrink", "<number>"),
    ("flex_wrap", "nowrap | wrap | wrap-reverse"),
    (
        "justify_content",
        "flex-start | flex-end | center | space-between | space-around",
    ),
    ("order", "<integer>"),
    // transitions
    ("transition", "<single_transition>#"),
    ("transition_delay", "<time>#"),
    ("transition_duration", "<time>#"),
    ("transition_property", "none | <single_transition_property>#"),
    ("transition_timing_function", "<timing_function>#"),
    // animations
    ("animation", "<single_animation>#"),
    ("animation_name", "[none | <keyframes_name>]#"),
    ("animation_duration", "<time>#"),
    ("animation_timing_function", "<timing_function>#"),
    (
        "animation_iteration_count",
        "<single_animation_iteration_count>#",
    ),
    ("animation_direction", "<single_animation_direction>#"),
    ("animation_play_state", "<single_animation_play_state>#"),
    ("animation_delay", "<time>#"),
    ("animation_fill_mode", "<single_animation_fill_mode>#"),
    // pointer events
    (
        "pointer_events",
        "visiblePainted | visibleFill | visibleStroke | visible | painted | fill | stroke \
         | all | none | auto",
    ),
    // user interface
    ("caret_color", "auto | <color>"),
    (
        "cursor",
        "[ <url> [<number> <number>]? , ]* [ auto | default | none | context-menu | help \
         | pointer | progress | wait | cell | crosshair | text | vertical-text | alias | copy \
         | move | no-drop | not-allowed | grab | grabbing | e-resize | n-resize | ne-resize \
         | nw-resize | s-resize | se-resize | sw-resize | w-resize | ew-resize | ns-resize \
         | nesw-resize | nwse-resize | col-resize | row-resize | all-scroll | zoom-in | zoom-out ]",
    ),
    ("outline", "<outline_color> || <outline_style> || <outline_width>"),
    ("outline_color", "<color> | invert"),
    ("outline_offset", "<length>"),
    ("outline_style", "auto | <line_style>"),
    ("outline_width", "<line_width>"),
    ("resize", "none | both | horizontal | vertical"),
    ("text_overflow", "clip | ellipsis"),
    // generated content
    ("bookmark_label", "<content_list>"),
    ("bookmark_level", "none | <integer>"),
    ("bookmark_state", "open | closed"),
    (
        "content",
        "normal | none | [ <string> | <uri> | <counter> | attr(<identifier>) | <quote> ]+",
    ),
    ("quotes", "none | [<string> <string>]+"),
    ("string_set", "none | [<custom_ident> <string>+]#"),
    // tables
    ("caption_side", "top | bottom"),
    ("table_layout", "auto | fixed"),
    ("border_collapse", "collapse | separate"),
    ("border_spacing", "<length> <length>?"),
    ("empty_cells", "show | hide"),
    // paging
    ("page_break_before", "auto | always | avoid | left | right"),
    ("page_break_after", "auto | always | avoid | left | right"),
    ("page_break_inside", "auto | avoid | left | right"),
    ("orphans", "<integer>"),
    ("widows", "<integer>"),
    // lists
    ("counter_increment", "none | [<custom_ident> <integer>?]+"),
    ("counter_reset", "none | [<custom_ident> <integer>?]+"),
    ("counter_set", "none | [<custom_ident> <integer>?]+"),
    (
        "list_style",
        "<list_style_type> || <list_style_position> || <list_style_image>",
    ),
    ("list_style_image", "<url> | none"),
    ("list_style_position", "inside | outside"),
    ("list_style_type", "none | <counter_style> | <string>"),
    ("marker_side", "list-item | list-container"),
    // visual effects
    (
        "vertical_align",
        "baseline | sub | super | top | text-top | middle | bottom | text-bottom \
         | <percentage> | <length>",
    ),
    ("clip", "<shape> | auto"),
    ("clip_path", "none | <clip_source> | [<basic_shape> || <geometry_box>]"),
    ("visibility", "visible | hidden | collapse"),
    // transforms and svg
    ("transform", "none | <transform2D>"),
    ("d", "none | <path>"),
];

/// Helper productions referenced by other grammars. They never set a
/// property of their own.
pub const VIRTUALS: &[(&str, &str)] = &[
    // counter styles
    (
        "counter_style",
        "<numeric_counter_style> | <alphabetic_counter_style> | <symbolic_counter_style> \
         | <japanese_counter_style> | <korean_counter_style> | <chinese_counter_style> \
         | ethiopic-numeric",
    ),
    (
        "numeric_counter_style",
        "decimal | decimal-leading-zero | arabic-indic | armenian | upper-armenian \
         | lower-armenian | bengali | cambodian | khmer | cjk-decimal | devanagari | georgian \
         | gujarati | gurmukhi | hebrew | kannada | lao | malayalam | mongolian | myanmar | oriya \
         | persian | lower-roman | upper-roman | tamil | telugu | thai | tibetan",
    ),
    (
        "symbolic_counter_style",
        "disc | circle | square | disclosure-open | disclosure-closed",
    ),
    (
        "alphabetic_counter_style",
        "lower-alpha | lower-latin | upper-alpha | upper-latin | cjk-earthly-branch \
         | cjk-heavenly-stem | lower-greek | hiragana | hiragana-iroha | katakana | katakana-iroha",
    ),
    ("japanese_counter_style", "japanese-informal | japanese-formal"),
    (
        "korean_counter_style",
        "korean-hangul-formal | korean-hanja-informal | korean-hanja-formal",
    ),
    (
        "chinese_counter_style",
        "simp-chinese-informal | simp-chinese-formal | trad-chinese-informal | trad-chinese-formal",
    ),
    ("counter", "counter( <custom_ident> [ , <counter_style> ]? )"),
    // generated content
    ("content_list", "[ <string> | contents | <image> | <quote> ]+"),
    ("quote", "open-quote | close-quote | no-open-quote | no-close-quote"),
    ("image", "<url> | <gradient>"),
    // values
    ("alphavalue", "<number>"),
    ("length_percentage", "<length> | <percentage>"),
    ("frequency_percentage", "<frequency> | <percentage>"),
    ("angle_percentage", "<angle> | <percentage>"),
    ("time_percentage", "<time> | <percentage>"),
    ("number_percentage", "<number> | <percentage>"),
    ("ratio", "<integer> / <integer>"),
    // boxes
    ("box", "border-box | padding-box | content-box"),
    ("shape_box", "<box> | margin-box"),
    ("geometry_box", "<shape_box> | fill-box | stroke-box | view-box"),
    ("basic_shape", "<shape>"),
    ("clip_source", "<url>"),
    // font sizes
    (
        "absolute_size",
        "xx-small | x-small | small | medium | large | x-large | xx-large",
    ),
    ("relative_size", "larger | smaller"),
    // backgrounds
    (
        "bg_layer",
        "<bg_image> || <bg_position> [ / <bg_size> ]? || <repeat_style> || <attachment> \
         || <box> || <box>",
    ),
    (
        "final_bg_layer",
        "<background_color> || <bg_image> || <bg_position> [ / <bg_size> ]? || <repeat_style> \
         || <attachment> || <box> || <box>",
    ),
    ("bg_image", "<url> | <gradient> | none"),
    (
        "repeat_style",
        "repeat-x | repeat-y | [repeat | space | round | no-repeat]{1,2}",
    ),
    ("bg_size", "[<length_percentage> | auto]{1,2} | cover | contain"),
    (
        "bg_position",
        "[left | center | right | top | bottom | <length_percentage>]{1,2}",
    ),
    ("attachment", "scroll | fixed | local"),
    // borders
    (
        "line_style",
        "none | hidden | dotted | dashed | solid | double | groove | ridge | inset | outset",
    ),
    ("line_width", "thin | medium | thick | <length>"),
    ("shadow", "inset? && <length>{2,4} && <color>?"),
    // font families
    ("family_name", "<fontname>"),
    ("generic_family", "serif | sans-serif | cursive | fantasy | monospace"),
    // font variants
    ("common_lig_values", "common-ligatures | no-common-ligatures"),
    (
        "discretionary_lig_values",
        "discretionary-ligatures | no-discretionary-ligatures",
    ),
    ("historical_lig_values", "historical-ligatures | no-historical-ligatures"),
    ("contextual_alt_values", "contextual | no-contextual"),
    ("numeric_figure_values", "lining-nums | oldstyle-nums"),
    ("numeric_spacing_values", "proportional-nums | tabular-nums"),
    ("numeric_fraction_values", "diagonal-fractions | stacked-fractions"),
    (
        "east_asian_variant_values",
        "jis78 | jis83 | jis90 | jis04 | simplified | traditional",
    ),
    ("east_asian_width_values", "full-width | proportional-width"),
    // timing
    (
        "timing_function",
        "linear | <cubic_bezier_timing_function> | <step_timing_function> \
         | <frames_timing_function>",
    ),
    ("cubic_bezier_timing_function", "<cubic_bezier>"),
    (
        "step_timing_function",
        "step-start | step-end | steps( <integer> [ , [start | end] ]? )",
    ),
    ("frames_timing_function", "frames( <integer> )"),
    // transitions
    ("single_transition_property", "all | <custom_ident>"),
    (
        "single_transition",
        "[none | <single_transition_property>] || <time> || <timing_function> || <time>",
    ),
    // animations
    ("single_animation_fill_mode", "none | forwards | backwards | both"),
    ("single_animation_play_state", "running | paused"),
    (
        "single_animation_direction",
        "normal | reverse | alternate | alternate-reverse",
    ),
    ("single_animation_iteration_count", "infinite | <number>"),
    (
        "single_animation",
        "<time> || <timing_function> || <time> || <single_animation_iteration_count> \
         || <single_animation_direction> || <single_animation_fill_mode> \
         || <single_animation_play_state> || [none | <keyframes_name>]",
    ),
    ("keyframes_name", "<custom_ident> | <string>"),
    // display
    ("display_outside", "block | inline | run-in"),
    ("display_inside", "flow | flow-root | table | flex | grid | ruby"),
    (
        "display_listitem",
        "<display_outside>? && [flow | flow-root]? && list-item",
    ),
    (
        "display_internal",
        "table-row-group | table-header-group | table-footer-group | table-row | table-cell \
         | table-column-group | table-column | table-caption | ruby-base | ruby-text \
         | ruby-base-container | ruby-text-container",
    ),
    ("display_box", "contents | none"),
    (
        "display_legacy",
        "inline-block | inline-table | inline-flex | inline-grid",
    ),
];

/// Media features usable inside an `@media` condition.
pub const MEDIA_FEATURES: &[(&str, &str)] = &[
    ("width", "<m_width>"),
    ("min_width", "<m_min_width>"),
    ("max_width", "<m_max_width>"),
    ("height", "<m_height>"),
    ("min_height", "<m_min_height>"),
    ("max_height", "<m_max_height>"),
    ("device_width", "<m_device_width>"),
    ("min_device_width", "<m_min_device_width>"),
    ("max_device_width", "<m_max_device_width>"),
    ("device_height", "<m_device_height>"),
    ("min_device_height", "<m_min_device_height>"),
    ("max_device_height", "<m_max_device_height>"),
    ("orientation", "portrait | landscape"),
    ("aspect_ratio", "<ratio>"),
    ("min_aspect_ratio", "<ratio>"),
    ("max_aspect_ratio", "<ratio>"),
    ("resolution", "<resolution>"),
    ("min_resolution", "<resolution>"),
    ("max_resolution", "<resolution>"),
    ("scan", "progressive | interlace"),
    ("grid", "<integer>"),
    ("monochrome", "<integer>"),
    ("min_monochrome", "<integer>"),
    ("max_monochrome", "<integer>"),
    ("color", "<integer>"),
    ("min_color", "<integer>"),
    ("max_color", "<integer>"),
    ("color_index", "<integer>"),
    ("min_color_index", "<integer>"),
    ("max_color_index", "<integer>"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{DefinitionTable, ParseRecord};
    use crate::lexer::Lexer;
    use crate::types::{Color, Length, Value};

    #[test]
    fn every_default_compiles() {
        let table = DefinitionTable::standard();
        for (name, _) in PROPERTIES {
            assert!(
                matches!(table.property(name), Ok(Some(_))),
                "{name}: {:?}",
                table.property(name).err()
            );
        }
        let media = DefinitionTable::media();
        for (name, _) in MEDIA_FEATURES {
            assert!(matches!(media.property(name), Ok(Some(_))), "{name}");
        }
    }

    #[test]
    fn helpers_compile_through_properties() {
        let table = DefinitionTable::standard();
        for (name, _) in VIRTUALS {
            assert!(table.is_virtual(name), "{name}");
            let notation = format!("<{name}>");
            assert!(table.compile(&notation, &format!("via_{name}")).is_ok(), "{name}");
        }
    }

    fn parse(property: &str, input: &str) -> Option<ParseRecord> {
        let term = DefinitionTable::standard().property(property).ok()??;
        let mut record = ParseRecord::new();
        term.parse(&mut Lexer::new(input), &mut record).then_some(record)
    }

    #[test]
    fn border_shorthand() {
        let record = parse("border", "2px solid red").unwrap();
        let values = record.get("border").unwrap().values().to_vec();
        assert_eq!(
            values,
            vec![
                Value::Length(Length::px(2.0)),
                Value::keyword("solid"),
                Value::Color(Color::rgb(255, 0, 0)),
            ]
        );
        assert!(parse("border", "solid solid").is_none());
    }

    #[test]
    fn shorthands_fill_longhands() {
        let record = parse("flex_flow", "wrap column").unwrap();
        assert_eq!(record.get_single("flex_wrap"), Some(&Value::keyword("wrap")));
        assert_eq!(
            record.get_single("flex_direction"),
            Some(&Value::keyword("column"))
        );
    }

    #[test]
    fn display_variants() {
        for input in ["block", "inline flex", "list-item", "block list-item", "inline-block", "none"] {
            assert!(parse("display", input).is_some(), "{input}");
        }
        assert!(parse("display", "block block").is_none());
    }

    #[test]
    fn font_shorthand() {
        let record = parse("font", "italic bold 12px/1.5 serif").unwrap();
        assert_eq!(record.get_single("font_style"), Some(&Value::keyword("italic")));
        assert_eq!(record.get_single("font_weight"), Some(&Value::keyword("bold")));
        assert_eq!(
            record.get_single("font_size"),
            Some(&Value::Length(Length::px(12.0)))
        );
        assert!(record.contains("font_family"));
    }

    #[test]
    fn timing_functions() {
        assert!(parse("transition_timing_function", "ease, steps(4, end), linear").is_some());
        assert!(parse("transition", "opacity 0.3s ease-in").is_some());
        assert!(parse("animation", "slide 1s infinite alternate").is_some());
    }

    #[test]
    fn media_features_use_media_leaves() {
        let term = DefinitionTable::media().property("min-width").unwrap().unwrap();
        let mut record = ParseRecord::new();
        assert!(term.parse(&mut Lexer::new("600px"), &mut record));
        assert!(matches!(
            record.get_single("min_width"),
            Some(Value::MediaFeature(_))
        ));
    }
}
