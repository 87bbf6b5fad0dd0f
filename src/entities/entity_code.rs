//! Entity type codes and the factory that maps them to variants

use super::{
    AssociativityInstance, CircularArc, CompositeCurve, EntityType, Line, Placeholder,
    RationalBSplineCurve, TransformationMatrix,
};
use ahash::AHashMap;
use once_cell::sync::Lazy;

/// Documented IGES entity types
const ENTITY_TYPES: &[(i32, &str)] = &[
    (0, "Null"),
    (100, "Circular Arc"),
    (102, "Composite Curve"),
    (104, "Conic Arc"),
    (106, "Copious Data"),
    (108, "Plane"),
    (110, "Line"),
    (112, "Parametric Spline Curve"),
    (114, "Parametric Spline Surface"),
    (116, "Point"),
    (118, "Ruled Surface"),
    (120, "Surface of Revolution"),
    (122, "Tabulated Cylinder"),
    (123, "Direction"),
    (124, "Transformation Matrix"),
    (125, "Flash"),
    (126, "Rational B-Spline Curve"),
    (128, "Rational B-Spline Surface"),
    (130, "Offset Curve"),
    (132, "Connect Point"),
    (134, "Node"),
    (136, "Finite Element"),
    (138, "Nodal Displacement and Rotation"),
    (140, "Offset Surface"),
    (141, "Boundary"),
    (142, "Curve on a Parametric Surface"),
    (143, "Bounded Surface"),
    (144, "Trimmed Parametric Surface"),
    (146, "Nodal Results"),
    (148, "Element Results"),
    (150, "Block"),
    (152, "Right Angular Wedge"),
    (154, "Right Circular Cylinder"),
    (156, "Right Circular Cone Frustum"),
    (158, "Sphere"),
    (160, "Torus"),
    (162, "Solid of Revolution"),
    (164, "Solid of Linear Extrusion"),
    (168, "Ellipsoid"),
    (180, "Boolean Tree"),
    (182, "Selected Component"),
    (184, "Solid Assembly"),
    (186, "Manifold Solid B-Rep Object"),
    (190, "Plane Surface"),
    (192, "Right Circular Cylindrical Surface"),
    (194, "Right Circular Conical Surface"),
    (196, "Spherical Surface"),
    (198, "Toroidal Surface"),
    (202, "Angular Dimension"),
    (204, "Curve Dimension"),
    (206, "Diameter Dimension"),
    (208, "Flag Note"),
    (210, "General Label"),
    (212, "General Note"),
    (213, "New General Note"),
    (214, "Leader (Arrow)"),
    (216, "Linear Dimension"),
    (218, "Ordinate Dimension"),
    (220, "Point Dimension"),
    (222, "Radius Dimension"),
    (228, "General Symbol"),
    (230, "Sectioned Area"),
    (302, "Associativity Definition"),
    (304, "Line Font Definition"),
    (306, "Macro Definition"),
    (308, "Subfigure Definition"),
    (310, "Text Font Definition"),
    (312, "Text Display Template"),
    (314, "Color Definition"),
    (316, "Units Data"),
    (320, "Network Subfigure Definition"),
    (322, "Attribute Table Definition"),
    (402, "Associativity Instance"),
    (404, "Drawing"),
    (406, "Property"),
    (408, "Singular Subfigure Instance"),
    (410, "View"),
    (412, "Rectangular Array Subfigure Instance"),
    (414, "Circular Array Subfigure Instance"),
    (416, "External Reference"),
    (418, "Nodal Load/Constraint"),
    (420, "Network Subfigure Instance"),
    (422, "Attribute Table Instance"),
    (430, "Solid Instance"),
    (502, "Vertex"),
    (504, "Edge"),
    (508, "Loop"),
    (510, "Face"),
    (514, "Shell"),
];

static ENTITY_TYPE_NAMES: Lazy<AHashMap<i32, &'static str>> =
    Lazy::new(|| ENTITY_TYPES.iter().copied().collect());

/// Documented name of an entity type code
pub fn entity_type_name(code: i32) -> Option<&'static str> {
    ENTITY_TYPE_NAMES.get(&code).copied()
}

/// Every documented entity type code
pub fn known_entity_types() -> impl Iterator<Item = i32> {
    ENTITY_TYPES.iter().map(|&(code, _)| code)
}

/// Whether entities of this type carry readable geometry or structure
pub fn is_supported(code: i32) -> bool {
    matches!(
        code,
        CircularArc::TYPE_CODE
            | CompositeCurve::TYPE_CODE
            | Line::TYPE_CODE
            | TransformationMatrix::TYPE_CODE
            | RationalBSplineCurve::TYPE_CODE
            | AssociativityInstance::TYPE_CODE
    )
}

/// Create an empty entity for a directory entry's type code
///
/// Codes without a reader produce a [`Placeholder`] that keeps the code.
pub fn create_entity(code: i32) -> EntityType {
    match code {
        CircularArc::TYPE_CODE => EntityType::CircularArc(CircularArc::new()),
        CompositeCurve::TYPE_CODE => EntityType::CompositeCurve(CompositeCurve::new()),
        Line::TYPE_CODE => EntityType::Line(Line::new()),
        TransformationMatrix::TYPE_CODE => {
            EntityType::TransformationMatrix(TransformationMatrix::new())
        }
        RationalBSplineCurve::TYPE_CODE => {
            EntityType::RationalBSplineCurve(RationalBSplineCurve::new())
        }
        AssociativityInstance::TYPE_CODE => {
            EntityType::AssociativityInstance(AssociativityInstance::new())
        }
        _ => EntityType::Placeholder(Placeholder::new(code)),
    }
}
