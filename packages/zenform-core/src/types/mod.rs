//! Field type catalogue: tags, descriptors and the registry holding them.

mod builtin_types;
mod descriptor;
mod type_registry;
mod type_tag;

pub use builtin_types::{
    register_builtin_types, DEFAULT_FILE_MAX_BYTES, DEFAULT_ICON_MAX_BYTES, LONG_TEXT_WARN_BYTES,
    OPTION_LABEL_MAX_BYTES, SHORT_TEXT_MAX_BYTES,
};
pub use descriptor::{ListKind, TypeDescriptor, Widget};
pub use type_registry::TypeRegistry;
pub use type_tag::TypeTag;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_builtin_registry_knows_every_tag() {
        let registry = TypeRegistry::builtin().unwrap();
        assert_eq!(registry.len(), TypeTag::ALL.len());
        for tag in TypeTag::ALL {
            assert!(registry.contains(tag), "missing {tag}");
        }
    }

    #[test]
    fn test_list_kinds() {
        let registry = TypeRegistry::builtin().unwrap();

        let single = registry.lookup(TypeTag::SingleSelect).unwrap();
        assert!(single.is_list_type());
        assert_eq!(single.list_kind, ListKind::DropdownSelect);
        assert!(!single.is_extendable());

        let radio = registry.lookup(TypeTag::RadioSelect).unwrap();
        assert_eq!(radio.list_kind, ListKind::RadioGroup);
        assert_eq!(radio.widget, Widget::RadioGroup);

        let ext = registry.lookup(TypeTag::ExtendableSelect).unwrap();
        assert!(ext.is_list_type());
        assert!(ext.is_extendable());

        assert!(!registry.lookup(TypeTag::ShortText).unwrap().is_list_type());
    }

    #[test]
    fn test_file_metadata() {
        let registry = TypeRegistry::builtin().unwrap();

        let image = registry.lookup(TypeTag::ImageFile).unwrap();
        assert!(image.is_file_type());
        assert!(image.is_image_type());
        assert_eq!(image.resize_dimensions(), Some((800, 600)));
        assert_eq!(image.must_resize, Some(true));

        let icon = registry.lookup(TypeTag::IconFile).unwrap();
        assert_eq!(icon.resize_dimensions(), Some((50, 50)));
        assert_eq!(registry.max_bytes_for(TypeTag::IconFile), Some(300_000));

        let file = registry.lookup(TypeTag::GenericFile).unwrap();
        assert!(file.is_file_type());
        assert!(!file.is_image_type());
        assert_eq!(registry.max_bytes_for(TypeTag::GenericFile), Some(1_000_000));

        assert_eq!(registry.max_bytes_for(TypeTag::ShortText), None);
    }

    #[test]
    fn test_boolean_semantics() {
        let registry = TypeRegistry::builtin().unwrap();
        assert!(registry
            .lookup(TypeTag::Boolean)
            .unwrap()
            .has_boolean_semantics());
        assert!(!registry
            .lookup(TypeTag::Integer)
            .unwrap()
            .has_boolean_semantics());
    }

    #[test]
    fn test_lookup_unregistered_tag() {
        let registry = TypeRegistry::new();
        let err = registry.lookup(TypeTag::Date).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownType { .. }));
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = TypeRegistry::builtin().unwrap();
        let err = registry
            .register(TypeDescriptor::scalar(TypeTag::Date, Widget::Hidden))
            .unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyRegistered { .. }));
    }

    #[test]
    fn test_image_without_dimensions_rejected() {
        let mut registry = TypeRegistry::new();
        let mut image = TypeDescriptor::image(TypeTag::ImageFile, 1000, 10, 10);
        image.resize = None;

        let err = registry.register(image).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingImageMetadata {
                type_tag: "image_file".to_string(),
                property: "resize_dimensions",
            }
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_image_without_resize_flag_rejected() {
        let mut image = TypeDescriptor::image(TypeTag::IconFile, 1000, 10, 10);
        image.must_resize = None;
        assert!(matches!(
            image.validate(),
            Err(ConfigError::MissingImageMetadata {
                property: "must_resize",
                ..
            })
        ));
    }

    #[test]
    fn test_replace_revalidates() {
        let mut registry = TypeRegistry::builtin().unwrap();
        let mut icon = registry.lookup(TypeTag::IconFile).unwrap().clone();
        icon.max_bytes = Some(42);
        registry.replace(icon.clone()).unwrap();
        assert_eq!(registry.max_bytes_for(TypeTag::IconFile), Some(42));

        icon.max_bytes = None;
        assert!(registry.replace(icon).is_err());
        assert_eq!(registry.max_bytes_for(TypeTag::IconFile), Some(42));
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!("short_text".parse::<TypeTag>().unwrap(), TypeTag::ShortText);
        assert_eq!("_ELST".parse::<TypeTag>().unwrap(), TypeTag::ExtendableSelect);
        assert_eq!("_KEYS".parse::<TypeTag>().unwrap(), TypeTag::Key);
        assert!(matches!(
            "_NOPE".parse::<TypeTag>(),
            Err(ConfigError::UnknownType { type_tag }) if type_tag == "_NOPE"
        ));
    }

    #[test]
    fn test_resolve_checks_registration() {
        let registry = TypeRegistry::new();
        assert!(registry.resolve("key").is_err());

        let registry = TypeRegistry::builtin().unwrap();
        assert_eq!(registry.resolve("_DATE").unwrap(), TypeTag::Date);
    }

    #[test]
    fn test_descriptors_in_catalogue_order() {
        let registry = TypeRegistry::builtin().unwrap();
        let tags: Vec<TypeTag> = registry.descriptors().iter().map(|d| d.tag).collect();
        assert_eq!(tags, TypeTag::ALL.to_vec());
    }
}
