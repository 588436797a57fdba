/// Split a path into attribute segments.
///
/// In flat mode the whole string is a single literal segment, so attribute
/// names containing dots can be addressed verbatim.
pub(crate) fn segments(path: &str, flat: bool) -> Vec<&str> {
	if flat {
		vec![path]
	} else {
		path.split('.').collect()
	}
}

/// Split a path into its dotted prefix and final segment.
///
/// The prefix names the object the final segment applies to; it is empty
/// for single-segment paths.
pub(crate) fn prefix_and_last(path: &str, flat: bool) -> (Vec<&str>, &str) {
	let mut segs = segments(path, flat);
	let last = segs.pop().unwrap_or(path);
	(segs, last)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_dotted_split() {
		assert_eq!(segments("a.b.c", false), vec!["a", "b", "c"]);
		assert_eq!(segments("a", false), vec!["a"]);
	}

	#[test]
	fn test_flat_keeps_dots() {
		assert_eq!(segments("a.b.c", true), vec!["a.b.c"]);
	}

	#[test]
	fn test_prefix_and_last() {
		assert_eq!(prefix_and_last("a.b.c", false), (vec!["a", "b"], "c"));
		assert_eq!(prefix_and_last("a", false), (vec![], "a"));
		assert_eq!(prefix_and_last("a.b", true), (vec![], "a.b"));
	}

	#[test]
	fn test_degenerate_paths_split_naturally() {
		// Empty segments resolve (and fail) like any other attribute name.
		assert_eq!(segments("", false), vec![""]);
		assert_eq!(segments("a..b", false), vec!["a", "", "b"]);
		assert_eq!(segments("a.", false), vec!["a", ""]);
	}
}
