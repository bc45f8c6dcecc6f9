use super::Address;
use crate::Error;

/// Simple email envelope representation
///
/// The reverse path is where delivery failures are reported to, the forward
/// path lists every recipient the message is delivered to, including the
/// blind copies that do not show up in the formatted message.
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    /// The envelope recipients' addresses
    ///
    /// This can not be empty.
    forward_path: Vec<Address>,
    /// The envelope sender address
    reverse_path: Option<Address>,
}

impl Envelope {
    /// Creates a new envelope, which may fail if `to` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use missive::{Address, Envelope};
    ///
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let sender = "from@email.com".parse::<Address>()?;
    /// let recipients = vec!["to@email.com".parse::<Address>()?];
    ///
    /// let envelope = Envelope::new(Some(sender), recipients.clone())?;
    /// assert_eq!(envelope.to(), recipients.as_slice());
    /// assert!(Envelope::new(None, Vec::new()).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(from: Option<Address>, to: Vec<Address>) -> Result<Envelope, Error> {
        if to.is_empty() {
            return Err(Error::MissingField("recipients"));
        }
        Ok(Envelope {
            forward_path: to,
            reverse_path: from,
        })
    }

    /// Gets the destination addresses of the envelope.
    pub fn to(&self) -> &[Address] {
        self.forward_path.as_slice()
    }

    /// Gets the sender of the envelope.
    pub fn from(&self) -> Option<&Address> {
        self.reverse_path.as_ref()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::Envelope;
    use crate::address::Address;

    fn addresses(addrs: &[&str]) -> Vec<Address> {
        addrs.iter().map(|addr| addr.parse().unwrap()).collect()
    }

    #[test]
    fn keeps_recipient_order() {
        let to = addresses(&["to@example.com", "cc@example.com", "bcc@example.com"]);
        let envelope = Envelope::new(Some("sender@example.com".parse().unwrap()), to.clone())
            .unwrap();

        assert_eq!(envelope.from().unwrap().to_string(), "sender@example.com");
        assert_eq!(envelope.to(), to.as_slice());
    }

    #[test]
    fn reverse_path_is_optional() {
        let envelope = Envelope::new(None, addresses(&["to@example.com"])).unwrap();
        assert_eq!(envelope.from(), None);
    }

    #[test]
    fn envelope_without_recipients() {
        let err = Envelope::new(Some("sender@example.com".parse().unwrap()), Vec::new())
            .unwrap_err();
        assert!(err.is_missing_field());
    }
}
