use proptest::prelude::*;
use shellcmd::exec::{first_line, post_process};
use shellcmd::{Flag, Flags};

fn text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[ a-z\t\r\n]{0,40}").unwrap()
}

proptest! {
    #[test]
    fn trim_space_is_idempotent(out in text(), err in text()) {
        let flags = Flags::from(Flag::TrimSpace);
        let once = post_process(flags, out, err);
        let twice = post_process(flags, once.0.clone(), once.1.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn first_line_has_no_line_breaks(s in text()) {
        let line = first_line(&s);
        prop_assert!(!line.contains('\n'));
        prop_assert!(!line.contains('\r'));
    }

    #[test]
    fn first_line_is_the_prefix_before_newline(head in "[a-z \r]{0,10}", tail in text()) {
        let s = format!("{head}\n{tail}");
        prop_assert_eq!(first_line(&s), head.replace('\r', ""));
    }

    #[test]
    fn without_flags_output_is_untouched(out in text(), err in text()) {
        let got = post_process(Flags::empty(), out.clone(), err.clone());
        prop_assert_eq!(got, (out, err));
    }
}
