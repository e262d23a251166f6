//! OWL 2 class expressions, object property expressions and data ranges.

use crate::entity::{DataProperty, Datatype, Individual, ObjectProperty, OwlClass};
use oxrdf::{Literal, NamedNode};
use std::fmt;

/// An OWL 2 class expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassExpression {
    /// A named class
    Class(OwlClass),

    /// ObjectIntersectionOf(C1, ..., Cn)
    ObjectIntersectionOf(Vec<ClassExpression>),

    /// ObjectUnionOf(C1, ..., Cn)
    ObjectUnionOf(Vec<ClassExpression>),

    /// ObjectComplementOf(C)
    ObjectComplementOf(Box<ClassExpression>),

    /// ObjectOneOf(a1, ..., an)
    ObjectOneOf(Vec<Individual>),

    /// ObjectSomeValuesFrom(P, C)
    ObjectSomeValuesFrom {
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },

    /// ObjectAllValuesFrom(P, C)
    ObjectAllValuesFrom {
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },

    /// ObjectHasValue(P, a)
    ObjectHasValue {
        property: ObjectPropertyExpression,
        individual: Individual,
    },

    /// ObjectHasSelf(P)
    ObjectHasSelf(ObjectPropertyExpression),

    /// ObjectMinCardinality(n, P [C])
    ObjectMinCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Option<Box<ClassExpression>>,
    },

    /// ObjectMaxCardinality(n, P [C])
    ObjectMaxCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Option<Box<ClassExpression>>,
    },

    /// ObjectExactCardinality(n, P [C])
    ObjectExactCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Option<Box<ClassExpression>>,
    },

    /// DataSomeValuesFrom(P, D)
    DataSomeValuesFrom {
        property: DataProperty,
        filler: DataRange,
    },

    /// DataAllValuesFrom(P, D)
    DataAllValuesFrom {
        property: DataProperty,
        filler: DataRange,
    },

    /// DataHasValue(P, v)
    DataHasValue {
        property: DataProperty,
        value: Literal,
    },

    /// DataMinCardinality(n, P [D])
    DataMinCardinality {
        cardinality: u32,
        property: DataProperty,
        filler: Option<DataRange>,
    },

    /// DataMaxCardinality(n, P [D])
    DataMaxCardinality {
        cardinality: u32,
        property: DataProperty,
        filler: Option<DataRange>,
    },

    /// DataExactCardinality(n, P [D])
    DataExactCardinality {
        cardinality: u32,
        property: DataProperty,
        filler: Option<DataRange>,
    },
}

impl ClassExpression {
    pub fn class(c: impl Into<OwlClass>) -> Self {
        Self::Class(c.into())
    }

    pub fn intersection(classes: Vec<ClassExpression>) -> Self {
        Self::ObjectIntersectionOf(classes)
    }

    pub fn union(classes: Vec<ClassExpression>) -> Self {
        Self::ObjectUnionOf(classes)
    }

    pub fn complement(c: ClassExpression) -> Self {
        Self::ObjectComplementOf(Box::new(c))
    }

    /// Creates an existential restriction.
    pub fn some_values_from(
        property: impl Into<ObjectPropertyExpression>,
        filler: ClassExpression,
    ) -> Self {
        Self::ObjectSomeValuesFrom {
            property: property.into(),
            filler: Box::new(filler),
        }
    }

    /// Creates a universal restriction.
    pub fn all_values_from(
        property: impl Into<ObjectPropertyExpression>,
        filler: ClassExpression,
    ) -> Self {
        Self::ObjectAllValuesFrom {
            property: property.into(),
            filler: Box::new(filler),
        }
    }

    /// Returns true if this is a named class.
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Class(_))
    }

    pub fn as_class(&self) -> Option<&OwlClass> {
        match self {
            Self::Class(c) => Some(c),
            _ => None,
        }
    }
}

impl From<OwlClass> for ClassExpression {
    fn from(c: OwlClass) -> Self {
        Self::Class(c)
    }
}

impl From<NamedNode> for ClassExpression {
    fn from(iri: NamedNode) -> Self {
        Self::Class(iri.into())
    }
}

impl fmt::Display for ClassExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(c) => write!(f, "{c}"),
            Self::ObjectIntersectionOf(cs) => write_list(f, "ObjectIntersectionOf", cs),
            Self::ObjectUnionOf(cs) => write_list(f, "ObjectUnionOf", cs),
            Self::ObjectComplementOf(c) => write!(f, "ObjectComplementOf({c})"),
            Self::ObjectOneOf(is) => write_list(f, "ObjectOneOf", is),
            Self::ObjectSomeValuesFrom { property, filler } => {
                write!(f, "ObjectSomeValuesFrom({property} {filler})")
            }
            Self::ObjectAllValuesFrom { property, filler } => {
                write!(f, "ObjectAllValuesFrom({property} {filler})")
            }
            Self::ObjectHasValue {
                property,
                individual,
            } => write!(f, "ObjectHasValue({property} {individual})"),
            Self::ObjectHasSelf(p) => write!(f, "ObjectHasSelf({p})"),
            Self::ObjectMinCardinality {
                cardinality,
                property,
                filler,
            } => write_cardinality(f, "ObjectMinCardinality", *cardinality, property, filler.as_deref()),
            Self::ObjectMaxCardinality {
                cardinality,
                property,
                filler,
            } => write_cardinality(f, "ObjectMaxCardinality", *cardinality, property, filler.as_deref()),
            Self::ObjectExactCardinality {
                cardinality,
                property,
                filler,
            } => write_cardinality(f, "ObjectExactCardinality", *cardinality, property, filler.as_deref()),
            Self::DataSomeValuesFrom { property, filler } => {
                write!(f, "DataSomeValuesFrom({property} {filler})")
            }
            Self::DataAllValuesFrom { property, filler } => {
                write!(f, "DataAllValuesFrom({property} {filler})")
            }
            Self::DataHasValue { property, value } => {
                write!(f, "DataHasValue({property} {value})")
            }
            Self::DataMinCardinality {
                cardinality,
                property,
                filler,
            } => write_cardinality(f, "DataMinCardinality", *cardinality, property, filler.as_ref()),
            Self::DataMaxCardinality {
                cardinality,
                property,
                filler,
            } => write_cardinality(f, "DataMaxCardinality", *cardinality, property, filler.as_ref()),
            Self::DataExactCardinality {
                cardinality,
                property,
                filler,
            } => write_cardinality(f, "DataExactCardinality", *cardinality, property, filler.as_ref()),
        }
    }
}

/// An OWL 2 object property expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectPropertyExpression {
    ObjectProperty(ObjectProperty),

    /// ObjectInverseOf(P)
    ObjectInverseOf(ObjectProperty),
}

impl ObjectPropertyExpression {
    pub fn inverse(property: impl Into<ObjectProperty>) -> Self {
        Self::ObjectInverseOf(property.into())
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Self::ObjectProperty(_))
    }

    /// Returns the property, looking through a possible inverse.
    pub fn base_property(&self) -> &ObjectProperty {
        match self {
            Self::ObjectProperty(p) | Self::ObjectInverseOf(p) => p,
        }
    }
}

impl From<ObjectProperty> for ObjectPropertyExpression {
    fn from(p: ObjectProperty) -> Self {
        Self::ObjectProperty(p)
    }
}

impl From<NamedNode> for ObjectPropertyExpression {
    fn from(p: NamedNode) -> Self {
        Self::ObjectProperty(p.into())
    }
}

impl fmt::Display for ObjectPropertyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectProperty(p) => write!(f, "{p}"),
            Self::ObjectInverseOf(p) => write!(f, "ObjectInverseOf({p})"),
        }
    }
}

/// An OWL 2 data range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataRange {
    /// A named datatype (e.g., xsd:string)
    Datatype(Datatype),

    /// DataIntersectionOf(D1, ..., Dn)
    DataIntersectionOf(Vec<DataRange>),

    /// DataUnionOf(D1, ..., Dn)
    DataUnionOf(Vec<DataRange>),

    /// DataComplementOf(D)
    DataComplementOf(Box<DataRange>),

    /// DataOneOf(v1, ..., vn)
    DataOneOf(Vec<Literal>),

    /// DatatypeRestriction(D, facet1 value1, ...)
    DatatypeRestriction {
        datatype: Datatype,
        facets: Vec<(NamedNode, Literal)>,
    },
}

impl DataRange {
    pub fn datatype(dt: impl Into<Datatype>) -> Self {
        Self::Datatype(dt.into())
    }

    pub fn as_datatype(&self) -> Option<&Datatype> {
        match self {
            Self::Datatype(dt) => Some(dt),
            _ => None,
        }
    }
}

impl From<Datatype> for DataRange {
    fn from(datatype: Datatype) -> Self {
        Self::Datatype(datatype)
    }
}

impl From<NamedNode> for DataRange {
    fn from(node: NamedNode) -> Self {
        Self::Datatype(node.into())
    }
}

impl fmt::Display for DataRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Datatype(dt) => write!(f, "{dt}"),
            Self::DataIntersectionOf(ds) => write_list(f, "DataIntersectionOf", ds),
            Self::DataUnionOf(ds) => write_list(f, "DataUnionOf", ds),
            Self::DataComplementOf(d) => write!(f, "DataComplementOf({d})"),
            Self::DataOneOf(vs) => write_list(f, "DataOneOf", vs),
            Self::DatatypeRestriction { datatype, facets } => {
                write!(f, "DatatypeRestriction({datatype}")?;
                for (facet, value) in facets {
                    write!(f, " {facet} {value}")?;
                }
                f.write_str(")")
            }
        }
    }
}

pub(crate) fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    items: &[T],
) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(")")
}

fn write_cardinality<P: fmt::Display, F: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    cardinality: u32,
    property: &P,
    filler: Option<&F>,
) -> fmt::Result {
    write!(f, "{name}({cardinality} {property}")?;
    if let Some(filler) = filler {
        write!(f, " {filler}")?;
    }
    f.write_str(")")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let person = OwlClass::new(NamedNode::new_unchecked("http://example.org/Person"));
        let knows = ObjectProperty::new(NamedNode::new_unchecked("http://example.org/knows"));
        let expression = ClassExpression::some_values_from(
            ObjectPropertyExpression::inverse(knows),
            person.into(),
        );
        assert_eq!(
            expression.to_string(),
            "ObjectSomeValuesFrom(ObjectInverseOf(<http://example.org/knows>) <http://example.org/Person>)"
        );
    }

    #[test]
    fn test_base_property() {
        let knows = ObjectProperty::new(NamedNode::new_unchecked("http://example.org/knows"));
        assert_eq!(
            ObjectPropertyExpression::inverse(knows.clone()).base_property(),
            &knows
        );
        assert!(ObjectPropertyExpression::from(knows).is_named());
    }
}
