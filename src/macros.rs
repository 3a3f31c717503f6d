// auto-implement ToFromNetworkOrder for enums whose wire representation is a
// single u8 or u16 value, once DnsEnum has given them TryFrom/Default/FromStr.
#[macro_export]
macro_rules! derive_enum {
    ($t:ty, u8) => {
        impl<'a> $crate::network_order::ToFromNetworkOrder<'a> for $t {
            fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
                use byteorder::WriteBytesExt;
                buffer.write_u8(*self as u8)?;
                Ok(1)
            }

            fn from_network_bytes(
                &mut self,
                buffer: &mut std::io::Cursor<&'a [u8]>,
            ) -> $crate::error::DNSResult<()> {
                use byteorder::ReadBytesExt;
                let value = buffer.read_u8()?;
                *self = <$t>::try_from(value).map_err($crate::error::DNSError::from)?;
                Ok(())
            }
        }
    };

    ($t:ty, u16) => {
        impl<'a> $crate::network_order::ToFromNetworkOrder<'a> for $t {
            fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
                use byteorder::{BigEndian, WriteBytesExt};
                buffer.write_u16::<BigEndian>(*self as u16)?;
                Ok(2)
            }

            fn from_network_bytes(
                &mut self,
                buffer: &mut std::io::Cursor<&'a [u8]>,
            ) -> $crate::error::DNSResult<()> {
                use byteorder::{BigEndian, ReadBytesExt};
                let value = buffer.read_u16::<BigEndian>()?;
                *self = <$t>::try_from(value).map_err($crate::error::DNSError::from)?;
                Ok(())
            }
        }
    };
}
