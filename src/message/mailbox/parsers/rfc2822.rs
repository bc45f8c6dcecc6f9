//! Partial parsers implementation of [RFC2822]: Internet Message
//! Format.
//!
//! Comments and domain literals are not supported.
//!
//! [RFC2822]: https://datatracker.ietf.org/doc/html/rfc2822

use chumsky::{error::Cheap, prelude::*};

use super::{rfc2234, rfc5336};

/// Display name and `(user, domain)` pair of a parsed mailbox
pub(crate) type ParsedMailbox = (Option<String>, (String, String));

// 3.2.1. Primitive Tokens
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.1

// NO-WS-CTL = %d1-8 / %d11 / %d12 / %d14-31 / %d127
fn no_ws_ctl() -> impl Parser<char, char, Error = Cheap<char>> {
    filter(|c: &char| matches!(u32::from(*c), 1..=8 | 11 | 12 | 14..=31 | 127))
}

// text = %d1-9 / %d11 / %d12 / %d14-127 / obs-text
fn text() -> impl Parser<char, char, Error = Cheap<char>> {
    filter(|c: &char| matches!(u32::from(*c), 1..=9 | 11 | 12 | 14..=127))
}

// 3.2.2. Quoted characters

// quoted-pair = ("\" text) / obs-qp
fn quoted_pair() -> impl Parser<char, char, Error = Cheap<char>> {
    just('\\').ignore_then(text())
}

// 3.2.3. Folding white space and comments
//
// Headers reach the parser unfolded, so FWS is reduced to a run of WSP
// collapsing into a single space, and CFWS to FWS.

// FWS = ([*WSP CRLF] 1*WSP) / obs-FWS
fn fws() -> impl Parser<char, Option<char>, Error = Cheap<char>> {
    rfc2234::wsp()
        .or_not()
        .then_ignore(rfc2234::wsp().ignored().repeated())
}

// CFWS = *([FWS] comment) (([FWS] comment) / FWS)
fn cfws() -> impl Parser<char, Option<char>, Error = Cheap<char>> {
    fws()
}

// 3.2.4. Atom

// atext = ALPHA / DIGIT / "!" / "#" / "$" / "%" / "&" / "'" / "*" / "+" /
//         "-" / "/" / "=" / "?" / "^" / "_" / "`" / "{" / "|" / "}" / "~"
//
// Non ASCII characters are accepted too (RFC5336).
fn atext() -> impl Parser<char, char, Error = Cheap<char>> {
    choice((
        rfc2234::alpha(),
        rfc2234::digit(),
        one_of("!#$%&'*+-/=?^_`{|}~"),
        rfc5336::utf8_non_ascii(),
    ))
}

// atom = [CFWS] 1*atext [CFWS]
fn atom() -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    cfws().chain(atext().repeated().at_least(1))
}

// dot-atom = [CFWS] dot-atom-text [CFWS]
fn dot_atom() -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    cfws().chain(dot_atom_text())
}

// dot-atom-text = 1*atext *("." 1*atext)
fn dot_atom_text() -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    atext().repeated().at_least(1).chain(
        just('.')
            .chain(atext().repeated().at_least(1))
            .repeated()
            .flatten(),
    )
}

// 3.2.5. Quoted strings

// qtext = NO-WS-CTL / %d33 / %d35-91 / %d93-126
fn qtext() -> impl Parser<char, char, Error = Cheap<char>> {
    choice((
        filter(|c: &char| matches!(u32::from(*c), 33 | 35..=91 | 93..=126)),
        no_ws_ctl(),
    ))
}

// qcontent = qtext / quoted-pair
fn qcontent() -> impl Parser<char, char, Error = Cheap<char>> {
    choice((qtext(), quoted_pair(), rfc5336::utf8_non_ascii()))
}

// quoted-string = [CFWS] DQUOTE *([FWS] qcontent) [FWS] DQUOTE [CFWS]
fn quoted_string() -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    rfc2234::dquote()
        .ignore_then(fws().chain(qcontent()).repeated().flatten())
        .then_ignore(fws())
        .then_ignore(rfc2234::dquote())
}

// 3.2.6. Miscellaneous tokens

// word = atom / quoted-string
fn word() -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    choice((quoted_string(), atom()))
}

// phrase = 1*word / obs-phrase
fn phrase() -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    choice((obs_phrase(), word().repeated().at_least(1).flatten()))
}

// 3.4. Address Specification
// https://datatracker.ietf.org/doc/html/rfc2822#section-3.4

/// Parses a single `name-addr` or `addr-spec`
// mailbox = name-addr / addr-spec
pub(crate) fn mailbox() -> impl Parser<char, ParsedMailbox, Error = Cheap<char>> {
    name_addr_or_addr_spec().padded().then_ignore(end())
}

/// Parses a comma separated list of mailboxes
// mailbox-list = (mailbox *("," mailbox)) / obs-mbox-list
pub(crate) fn mailbox_list() -> impl Parser<char, Vec<ParsedMailbox>, Error = Cheap<char>> {
    name_addr_or_addr_spec()
        .separated_by(just(',').padded())
        .at_least(1)
        .padded()
        .then_ignore(end())
}

fn name_addr_or_addr_spec() -> impl Parser<char, ParsedMailbox, Error = Cheap<char>> {
    choice((name_addr(), addr_spec().map(|addr| (None, addr))))
}

// name-addr = [display-name] angle-addr
fn name_addr() -> impl Parser<char, ParsedMailbox, Error = Cheap<char>> {
    display_name()
        .collect::<String>()
        .or_not()
        .then(angle_addr())
}

// angle-addr = [CFWS] "<" addr-spec ">" [CFWS] / obs-angle-addr
fn angle_addr() -> impl Parser<char, (String, String), Error = Cheap<char>> {
    addr_spec()
        .delimited_by(just('<').ignored(), just('>').ignored())
        .padded()
}

// display-name = phrase
fn display_name() -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    phrase()
}

// 3.4.1. Addr-spec specification

// addr-spec = local-part "@" domain
fn addr_spec() -> impl Parser<char, (String, String), Error = Cheap<char>> {
    local_part()
        .collect::<String>()
        .then_ignore(just('@'))
        .then(domain().collect::<String>())
}

// local-part = dot-atom / quoted-string / obs-local-part
fn local_part() -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    choice((dot_atom(), quoted_string(), obs_local_part()))
}

// domain = dot-atom / domain-literal / obs-domain
fn domain() -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    choice((dot_atom(), obs_domain()))
}

// 4.1. Miscellaneous obsolete tokens

// obs-phrase = word *(word / "." / CFWS)
fn obs_phrase() -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    word().chain(
        choice((word(), just('.').repeated().exactly(1)))
            .repeated()
            .flatten(),
    )
}

// 4.4. Obsolete Addressing

// obs-local-part = word *("." word)
fn obs_local_part() -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    word().chain(just('.').chain(word()).repeated().flatten())
}

// obs-domain = atom *("." atom)
fn obs_domain() -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    atom().chain(just('.').chain(atom()).repeated().flatten())
}
