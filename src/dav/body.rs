//! Request body builders for the tag collection.
//!
//! Pure functions producing the literal PROPFIND/PROPPATCH payloads; no
//! network or parsing logic lives here.

use quick_xml::escape::escape;

use crate::tags::{ObjectRef, Tag};

/// PROPFIND body requesting the full tag property set.
pub const TAG_LIST_BODY: &str = r#"<?xml version="1.0"?>
<d:propfind xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns" xmlns:nc="http://nextcloud.org/ns">
	<d:prop>
		<oc:id />
		<oc:display-name />
		<oc:user-visible />
		<oc:user-assignable />
		<oc:can-assign />
		<d:getetag />
		<nc:color />
	</d:prop>
</d:propfind>"#;

/// PROPFIND body requesting a tag's association set and its etag.
pub const OBJECT_IDS_BODY: &str = r#"<?xml version="1.0"?>
	<d:propfind xmlns:d="DAV:" xmlns:nc="http://nextcloud.org/ns">
		<d:prop>
			<nc:object-ids />
			<d:getetag />
		</d:prop>
	</d:propfind>"#;

const REMOVE_OBJECT_IDS_BODY: &str = r#"<?xml version="1.0"?>
	<d:propertyupdate xmlns:d="DAV:" xmlns:nc="http://nextcloud.org/ns">
		<d:remove>
			<d:prop>
				<nc:object-ids />
			</d:prop>
		</d:remove>
	</d:propertyupdate>"#;

/// PROPPATCH body updating a tag's mutable properties.
///
/// An absent or empty color is sent as the literal `null` marker, which the
/// server treats as "no color".
pub fn proppatch_update_tag(tag: &Tag) -> String {
    let color = match tag.color.as_deref().filter(|color| !color.is_empty()) {
        Some(color) => escape(color).into_owned(),
        None => String::from("null"),
    };
    format!(
        r#"<?xml version="1.0"?>
	<d:propertyupdate xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns" xmlns:nc="http://nextcloud.org/ns">
		<d:set>
			<d:prop>
				<oc:display-name>{display_name}</oc:display-name>
				<oc:user-visible>{user_visible}</oc:user-visible>
				<oc:user-assignable>{user_assignable}</oc:user-assignable>
				<nc:color>{color}</nc:color>
			</d:prop>
		</d:set>
	</d:propertyupdate>"#,
        display_name = escape(&tag.display_name),
        user_visible = tag.user_visible,
        user_assignable = tag.user_assignable,
    )
}

/// PROPPATCH body replacing a tag's association set.
///
/// An empty set uses the `<d:remove>` form; anything else a `<d:set>` with
/// one `object-id` child per reference.
pub fn proppatch_set_object_ids(objects: &[ObjectRef]) -> String {
    if objects.is_empty() {
        return String::from(REMOVE_OBJECT_IDS_BODY);
    }
    let children: String = objects
        .iter()
        .map(|object| {
            format!(
                "<nc:object-id><nc:id>{}</nc:id><nc:type>{}</nc:type></nc:object-id>",
                escape(&object.id),
                escape(&object.kind),
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0"?>
	<d:propertyupdate xmlns:d="DAV:" xmlns:nc="http://nextcloud.org/ns">
		<d:set>
			<d:prop>
				<nc:object-ids>{children}</nc:object-ids>
			</d:prop>
		</d:set>
	</d:propertyupdate>"#
    )
}
